//! Precomputed fuzzy search index over weighted document fields.
//!
//! The index is built once at build time and serialized to JSON. It holds,
//! for every document, the lower-cased text of each indexed field with a
//! length norm, plus a trigram inverted index used to prune candidates for
//! longer queries. A query-time consumer loads the JSON and calls
//! [`SearchIndex::search`] without touching the source documents.

mod query;

pub use query::{substring_distance, SearchHit, SearchOptions};

use crate::models::SearchEntry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Serialized index format version
pub const INDEX_VERSION: u32 = 1;

/// Length of the character n-grams in the inverted index
pub const GRAM_SIZE: usize = 3;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("At least one search field is required")]
    NoFields,

    #[error("Search field '{name}' has invalid weight {weight}; weights must be positive")]
    InvalidWeight { name: String, weight: f64 },

    #[error("Search field '{0}' is listed more than once")]
    DuplicateField(String),

    #[error("Unknown search field '{name}'; expected one of {expected:?}")]
    UnknownField {
        name: String,
        expected: &'static [&'static str],
    },

    #[error("Unsupported search index version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid search index JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A field to index and its relative weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchField {
    pub name: String,
    pub weight: f64,
}

impl SearchField {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Title first, preview slightly lower
pub fn default_fields() -> Vec<SearchField> {
    vec![SearchField::new("title", 1.0), SearchField::new("preview", 0.75)]
}

/// A document type whose text fields can be indexed
pub trait Searchable {
    /// Names accepted by [`Searchable::field`]
    const FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<&str>;

    fn slug(&self) -> &str;
}

impl Searchable for SearchEntry {
    const FIELDS: &'static [&'static str] = &["title", "preview", "slug"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "preview" => Some(&self.preview),
            "slug" => Some(&self.slug),
            _ => None,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}

/// An indexed field with its weight normalized so all weights sum to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexKey {
    pub name: String,
    pub weight: f64,
}

/// Lower-cased field text and its length norm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldText {
    #[serde(rename = "v")]
    pub value: String,

    /// `1 / sqrt(word count)`, rounded to three decimals
    #[serde(rename = "n")]
    pub norm: f64,
}

/// One indexed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Position of the document in the collection the index was built from
    #[serde(rename = "i")]
    pub position: usize,

    pub slug: String,

    /// One entry per key, in key order
    pub fields: Vec<FieldText>,
}

/// Serializable fuzzy search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub version: u32,
    pub keys: Vec<IndexKey>,
    pub records: Vec<IndexRecord>,

    /// Trigram to sorted `[record, key]` postings
    pub grams: BTreeMap<String, Vec<[u32; 2]>>,
}

/// Build a search index over `docs` using the weighted `fields`
///
/// The output depends only on the documents, their order and the field
/// configuration, so serializing it twice yields identical bytes.
pub fn build_index<D: Searchable>(
    docs: &[D],
    fields: &[SearchField],
) -> Result<SearchIndex, IndexError> {
    let keys = normalize_keys::<D>(fields)?;

    let mut grams: BTreeMap<String, BTreeSet<[u32; 2]>> = BTreeMap::new();
    let mut records = Vec::with_capacity(docs.len());

    for (position, doc) in docs.iter().enumerate() {
        let texts = keys
            .iter()
            .enumerate()
            .map(|(key_index, key)| {
                let value = doc.field(&key.name).unwrap_or_default().to_lowercase();
                for gram in char_grams(&value) {
                    grams
                        .entry(gram)
                        .or_default()
                        .insert([position as u32, key_index as u32]);
                }
                FieldText {
                    norm: length_norm(&value),
                    value,
                }
            })
            .collect();

        records.push(IndexRecord {
            position,
            slug: doc.slug().to_string(),
            fields: texts,
        });
    }

    tracing::debug!(
        "Built search index: {} records, {} keys, {} grams",
        records.len(),
        keys.len(),
        grams.len()
    );

    Ok(SearchIndex {
        version: INDEX_VERSION,
        keys,
        records,
        grams: grams
            .into_iter()
            .map(|(gram, postings)| (gram, postings.into_iter().collect()))
            .collect(),
    })
}

fn normalize_keys<D: Searchable>(fields: &[SearchField]) -> Result<Vec<IndexKey>, IndexError> {
    if fields.is_empty() {
        return Err(IndexError::NoFields);
    }

    let mut seen = BTreeSet::new();
    for field in fields {
        if !D::FIELDS.contains(&field.name.as_str()) {
            return Err(IndexError::UnknownField {
                name: field.name.clone(),
                expected: D::FIELDS,
            });
        }
        if !field.weight.is_finite() || field.weight <= 0.0 {
            return Err(IndexError::InvalidWeight {
                name: field.name.clone(),
                weight: field.weight,
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(IndexError::DuplicateField(field.name.clone()));
        }
    }

    let total: f64 = fields.iter().map(|f| f.weight).sum();
    Ok(fields
        .iter()
        .map(|field| IndexKey {
            name: field.name.clone(),
            weight: field.weight / total,
        })
        .collect())
}

/// Every window of [`GRAM_SIZE`] characters in `text`
pub(crate) fn char_grams(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(GRAM_SIZE)
        .map(|window| window.iter().collect())
        .collect()
}

fn length_norm(text: &str) -> f64 {
    let words = text.unicode_words().count();
    if words == 0 {
        return 1.0;
    }
    let norm = 1.0 / (words as f64).sqrt();
    (norm * 1000.0).round() / 1000.0
}

impl SearchIndex {
    /// Load a serialized index, rejecting other format versions
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        let index: SearchIndex = serde_json::from_str(json)?;
        if index.version != INDEX_VERSION {
            return Err(IndexError::UnsupportedVersion {
                found: index.version,
                expected: INDEX_VERSION,
            });
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
