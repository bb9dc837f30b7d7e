//! Front matter extraction from markdown files.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Front matter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\u{feff}?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n(.*))?$").unwrap()
    })
}

/// Parse front matter from markdown content
///
/// Returns a tuple of (front matter mapping, markdown body).
/// If no front matter is present, returns an empty mapping with the full
/// content as body; the schema decides whether that is acceptable.
///
/// # Example
///
/// ```
/// use folio_core::frontmatter::parse_front_matter;
///
/// let content = "---\ntitle: My Post\nslug: my-post\n---\n# Hello World\n";
///
/// let (fm, body) = parse_front_matter(content).unwrap();
/// assert_eq!(fm.get("title").and_then(|v| v.as_str()), Some("My Post"));
/// assert!(body.trim().starts_with("# Hello World"));
/// ```
pub fn parse_front_matter(content: &str) -> Result<(Mapping, String), FrontmatterError> {
    let re = frontmatter_regex();

    let Some(captures) = re.captures(content) else {
        return Ok((Mapping::new(), content.to_string()));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    if yaml.trim().is_empty() {
        return Ok((Mapping::new(), body.to_string()));
    }

    let mapping = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => mapping,
        // A block holding only comments parses as null
        Value::Null => Mapping::new(),
        Value::Bool(_) => return Err(FrontmatterError::NotAMapping("a boolean")),
        Value::Number(_) => return Err(FrontmatterError::NotAMapping("a number")),
        Value::String(_) => return Err(FrontmatterError::NotAMapping("a string")),
        Value::Sequence(_) => return Err(FrontmatterError::NotAMapping("a sequence")),
        Value::Tagged(_) => return Err(FrontmatterError::NotAMapping("a tagged value")),
    };

    Ok((mapping, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(fm: &'a Mapping, key: &str) -> Option<&'a Value> {
        fm.get(key)
    }

    #[test]
    fn test_parse_valid_front_matter() {
        let content = r#"---
title: Test Post
slug: test-post
published_at: 2025-01-01
authors:
  - osu_user_id: 2
    osu_username: peppy
---

# Hello World

This is the content."#;

        let (fm, body) = parse_front_matter(content).unwrap();
        assert_eq!(get(&fm, "title").and_then(Value::as_str), Some("Test Post"));
        assert_eq!(
            get(&fm, "published_at").and_then(Value::as_str),
            Some("2025-01-01")
        );
        let authors = get(&fm, "authors").and_then(Value::as_sequence).unwrap();
        assert_eq!(authors.len(), 1);
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_parse_no_front_matter() {
        let content = "# Just Content\n\nNo front matter here.";
        let (fm, body) = parse_front_matter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_empty_front_matter() {
        let content = "---\n---\nBody";
        let (fm, body) = parse_front_matter(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_front_matter_without_body() {
        let content = "---\ntitle: Terms\nslug: terms\n---";
        let (fm, body) = parse_front_matter(content).unwrap();
        assert_eq!(get(&fm, "slug").and_then(Value::as_str), Some("terms"));
        assert!(body.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = parse_front_matter(content).unwrap();
        assert_eq!(get(&fm, "title").and_then(Value::as_str), Some("Windows"));
        assert!(body.starts_with("Body"));
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(matches!(
            parse_front_matter(content),
            Err(FrontmatterError::YamlError(_))
        ));
    }

    #[test]
    fn test_non_mapping_front_matter() {
        let content = "---\n- a\n- b\n---\nBody";
        match parse_front_matter(content) {
            Err(FrontmatterError::NotAMapping(kind)) => assert_eq!(kind, "a sequence"),
            other => panic!("Expected NotAMapping error, got {:?}", other),
        }
    }
}
