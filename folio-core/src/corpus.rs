//! Loading a content directory into raw front matter documents.

use crate::frontmatter::{parse_front_matter, FrontmatterError};
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Content directory not found: {0:?}")]
    MissingDirectory(PathBuf),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Malformed front matter in \"{file}\": {source}")]
    Frontmatter {
        file: String,
        #[source]
        source: FrontmatterError,
    },
}

/// One source document before validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// File name, used for error context
    pub filename: String,

    /// Untyped front matter mapping
    pub front_matter: Mapping,
}

impl RawDocument {
    pub fn new(filename: impl Into<String>, front_matter: Mapping) -> Self {
        Self {
            filename: filename.into(),
            front_matter,
        }
    }

    /// Build a document from the full text of a markdown file
    pub fn from_markdown(filename: impl Into<String>, content: &str) -> Result<Self, CorpusError> {
        let filename = filename.into();
        match parse_front_matter(content) {
            Ok((front_matter, _body)) => Ok(Self {
                filename,
                front_matter,
            }),
            Err(source) => Err(CorpusError::Frontmatter {
                file: filename,
                source,
            }),
        }
    }
}

/// Load every markdown file directly inside `dir`, ordered by file name
pub fn load_corpus(dir: &Path) -> Result<Vec<RawDocument>, CorpusError> {
    if !dir.is_dir() {
        return Err(CorpusError::MissingDirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| CorpusError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == "md") {
            files.push(entry.into_path());
        }
    }

    tracing::debug!("Found {} markdown files in {:?}", files.len(), dir);

    files
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path).map_err(|source| CorpusError::Io {
                path: path.clone(),
                source,
            })?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            RawDocument::from_markdown(filename, &content)
        })
        .collect()
}
