//! Configuration parsing and management.

use crate::schema::DateFormat;
use crate::search::{default_fields, SearchField, SearchOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the folio.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub blog: BlogConfig,

    #[serde(default)]
    pub search: SearchConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_blog_dir")]
    pub blog: PathBuf,

    #[serde(default = "default_legal_dir")]
    pub legal: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

fn default_blog_dir() -> PathBuf {
    PathBuf::from("blog")
}

fn default_legal_dir() -> PathBuf {
    PathBuf::from("legal")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".dist")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Canonical form of `published_at`
    #[serde(default)]
    pub date_format: DateFormat,

    /// Prefix turning a bare `image` filename into a URL
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,
}

fn default_media_base_url() -> String {
    String::from("/media/blog/")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_fields")]
    pub fields: Vec<SearchField>,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_threshold() -> f64 {
    SearchOptions::default().threshold
}

fn default_limit() -> usize {
    SearchOptions::default().limit
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            blog: default_blog_dir(),
            legal: default_legal_dir(),
            output: default_output_dir(),
        }
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default(),
            media_base_url: default_media_base_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            threshold: default_threshold(),
            limit: default_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            blog: BlogConfig::default(),
            search: SearchConfig::default(),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults rooted at
    /// the file's directory
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        tracing::debug!("No config at {:?}; using defaults", path);
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            ..Self::default()
        })
    }

    /// Blog source directory, resolved relative to config file
    pub fn blog_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.blog)
    }

    /// Legal source directory, resolved relative to config file
    pub fn legal_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.legal)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Query options derived from the search section
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.search.limit,
            threshold: self.search.threshold,
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}
