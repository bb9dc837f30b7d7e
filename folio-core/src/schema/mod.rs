//! Front matter schema validation.
//!
//! Schemas are composed from [`Rule`] values. A rule checks one YAML value,
//! records every constraint it violates into [`Issues`] under the field's
//! dotted path, and on success returns the typed (and possibly transformed)
//! value. Transforms such as date normalization or URL prefixing live inside
//! the rule that checks the field, so a document is validated and reshaped in
//! a single pass.

mod documents;
mod rules;

pub use documents::{BlogSchema, DocumentSchema, LegalSchema};
pub use rules::{
    date, default_to, integer, list, media, object, one_of, optional, string, DateFormat, DateRule,
    DefaultRule, Fields, IntegerRule, ListRule, LiteralRule, MediaRule, ObjectRule, OptionalRule,
    Rule, StringRule,
};

use crate::models::ContentKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Constraint violations for one document, keyed by dotted field path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Issues(BTreeMap<String, Vec<String>>);

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for a field
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for a field path
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    /// Failing field paths in sorted order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, messages)) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let path = if path.is_empty() { "(root)" } else { path.as_str() };
            write!(f, "  {}: {}", path, messages.join("; "))?;
        }
        Ok(())
    }
}

/// A document whose front matter does not satisfy its schema
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Error validating front matter for {kind} file \"{file}\":\n{issues}")]
pub struct ValidationError {
    pub kind: ContentKind,
    pub file: String,
    pub issues: Issues,
}

impl ValidationError {
    pub fn new(kind: ContentKind, file: impl Into<String>, issues: Issues) -> Self {
        Self {
            kind,
            file: file.into(),
            issues,
        }
    }
}

/// Join a parent path and a child key with a dot
pub(crate) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
