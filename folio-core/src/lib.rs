//! # folio-core
//!
//! Core library for the folio content pipeline.
//!
//! This crate turns a directory of Markdown documents with YAML front matter
//! into the in-memory structures a static site consumes: validated documents,
//! deduplicated author and tag registries, and a precomputed fuzzy search index.

pub mod config;
pub mod corpus;
pub mod frontmatter;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod search;
pub mod slug;

pub use config::Config;
pub use corpus::{load_corpus, CorpusError, RawDocument};
pub use models::{
    AuthorRecord, BlogPost, ContentKind, LegalDocument, NormalizedPost, SearchEntry, Tag, TagRecord,
};
pub use normalize::{normalize, AuthorRegistry, Normalized, TagRegistry};
pub use pipeline::{BlogBuild, LegalBuild, Pipeline, PipelineError};
pub use schema::{Issues, ValidationError};
pub use search::{build_index, SearchField, SearchHit, SearchIndex, SearchOptions};
pub use slug::{is_valid_slug, tag_slug};
