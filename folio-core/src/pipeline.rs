//! Build pipeline connecting loading, validation, normalization and indexing
//!
//! Flow: Corpus → Validate (per document, fail fast) → Uniqueness checks
//!       → Normalize (blog only) → Search index (blog only)
//!
//! Nothing is returned unless every stage succeeds for the whole corpus, so
//! callers never see (or write) a partial build.

use crate::config::Config;
use crate::corpus::{load_corpus, CorpusError, RawDocument};
use crate::models::{BlogPost, ContentKind, LegalDocument, NormalizedPost, SearchEntry, Tag};
use crate::normalize::{normalize, AuthorRegistry, TagRegistry};
use crate::schema::{BlogSchema, DocumentSchema, LegalSchema, ValidationError};
use crate::search::{build_index, IndexError, SearchIndex};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Schema(#[from] ValidationError),

    #[error("Duplicate slug \"{slug}\" in {kind} files \"{first}\" and \"{second}\"")]
    SlugCollision {
        kind: ContentKind,
        slug: String,
        first: String,
        second: String,
    },

    #[error("Duplicate id {id} in blog files \"{first}\" and \"{second}\"")]
    DuplicateId {
        id: u64,
        first: String,
        second: String,
    },

    #[error("No id left to assign to blog file \"{file}\" after id {last}")]
    IdOverflow { file: String, last: u64 },

    #[error("Failed to build search index: {0}")]
    Index(#[from] IndexError),
}

impl PipelineError {
    /// File the error is attributed to, if any
    pub fn file(&self) -> Option<&str> {
        match self {
            PipelineError::Schema(err) => Some(err.file.as_str()),
            PipelineError::SlugCollision { second, .. } => Some(second.as_str()),
            PipelineError::DuplicateId { second, .. } => Some(second.as_str()),
            PipelineError::IdOverflow { file, .. } => Some(file.as_str()),
            PipelineError::Corpus(CorpusError::Frontmatter { file, .. }) => Some(file.as_str()),
            PipelineError::Corpus(_) | PipelineError::Index(_) => None,
        }
    }
}

/// Everything the blog artifacts are made of
#[derive(Debug, Clone)]
pub struct BlogBuild {
    pub posts: Vec<NormalizedPost>,
    pub authors: AuthorRegistry,
    pub tags: TagRegistry,
    pub search: Vec<SearchEntry>,
    pub index: SearchIndex,
}

/// Legal documents plus the tag enumeration the site shares with them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegalBuild {
    pub documents: Vec<LegalDocument>,
    pub tags: Vec<Tag>,
}

/// Runs the build for each content kind
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load and build the blog directory
    pub fn build_blog(&self) -> Result<BlogBuild, PipelineError> {
        let dir = self.config.blog_dir();
        tracing::info!("Loading blog posts from {:?}", dir);
        let raws = load_corpus(&dir)?;
        self.blog_from_documents(&raws)
    }

    /// Load and build the legal directory
    pub fn build_legal(&self) -> Result<LegalBuild, PipelineError> {
        let dir = self.config.legal_dir();
        tracing::info!("Loading legal documents from {:?}", dir);
        let raws = load_corpus(&dir)?;
        self.legal_from_documents(&raws)
    }

    /// Build blog output from already loaded documents, in the given order
    pub fn blog_from_documents(&self, raws: &[RawDocument]) -> Result<BlogBuild, PipelineError> {
        let schema = BlogSchema::new(
            self.config.blog.date_format,
            self.config.blog.media_base_url.as_str(),
        );

        let mut posts = validate_all(&schema, raws)?;
        assign_ids(&mut posts, raws)?;

        let normalized = normalize(&posts);
        let search: Vec<SearchEntry> = normalized.posts.iter().map(SearchEntry::from).collect();
        let index = build_index(&search, &self.config.search.fields)?;

        tracing::info!(
            "Built {} posts ({} authors, {} tags)",
            normalized.posts.len(),
            normalized.authors.len(),
            normalized.tags.len()
        );

        Ok(BlogBuild {
            posts: normalized.posts,
            authors: normalized.authors,
            tags: normalized.tags,
            search,
            index,
        })
    }

    /// Build legal output from already loaded documents, in the given order
    pub fn legal_from_documents(&self, raws: &[RawDocument]) -> Result<LegalBuild, PipelineError> {
        let documents = validate_all(&LegalSchema, raws)?;

        tracing::info!("Built {} legal documents", documents.len());

        Ok(LegalBuild {
            documents,
            tags: Tag::ALL.to_vec(),
        })
    }
}

/// Validate every document, stopping at the first failure or repeated slug
fn validate_all<S: DocumentSchema>(
    schema: &S,
    raws: &[RawDocument],
) -> Result<Vec<S::Document>, PipelineError> {
    let mut documents = Vec::with_capacity(raws.len());
    let mut slugs: HashMap<String, &str> = HashMap::new();

    for raw in raws {
        let document = schema.validate(raw)?;
        let slug = S::slug(&document);
        tracing::debug!("Validated {} ({})", raw.filename, slug);

        if let Some(first) = slugs.insert(slug.to_string(), raw.filename.as_str()) {
            return Err(PipelineError::SlugCollision {
                kind: S::KIND,
                slug: slug.to_string(),
                first: first.to_string(),
                second: raw.filename.clone(),
            });
        }
        documents.push(document);
    }

    Ok(documents)
}

/// Check explicit ids are unique, then number the rest after the highest one
fn assign_ids(posts: &mut [BlogPost], raws: &[RawDocument]) -> Result<(), PipelineError> {
    let mut owners: HashMap<u64, usize> = HashMap::new();
    for (index, post) in posts.iter().enumerate() {
        let Some(id) = post.id else { continue };
        if let Some(first) = owners.insert(id, index) {
            return Err(PipelineError::DuplicateId {
                id,
                first: raws[first].filename.clone(),
                second: raws[index].filename.clone(),
            });
        }
    }

    let mut last = owners.keys().max().copied().unwrap_or(0);
    for (index, post) in posts.iter_mut().enumerate() {
        if post.id.is_some() {
            continue;
        }
        let Some(next) = last.checked_add(1) else {
            return Err(PipelineError::IdOverflow {
                file: raws[index].filename.clone(),
                last,
            });
        };
        tracing::debug!("Assigned id {} to '{}'", next, post.slug);
        post.id = Some(next);
        last = next;
    }

    Ok(())
}
