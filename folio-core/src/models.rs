//! Content model structs for posts, legal documents, authors and tags.

use crate::slug::tag_slug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content a corpus directory holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Blog,
    Legal,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::Legal => "legal",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of tags a post may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Development,
    Announcement,
    Update,
    Tutorial,
}

impl Tag {
    /// Every tag literal, in declaration order
    pub const ALL: [Tag; 4] = [
        Tag::Development,
        Tag::Announcement,
        Tag::Update,
        Tag::Tutorial,
    ];

    /// Parse an exact (case-sensitive) tag literal
    pub fn from_literal(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == s)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tag::Development => "Development",
            Tag::Announcement => "Announcement",
            Tag::Update => "Update",
            Tag::Tutorial => "Tutorial",
        }
    }

    pub fn slug(&self) -> String {
        tag_slug(self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An author as embedded in a post's front matter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// Platform user id
    pub osu_user_id: u64,

    /// Display name
    pub osu_username: String,
}

/// A validated blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Explicit id from front matter; the pipeline fills in missing ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub title: String,
    pub slug: String,
    pub preview: String,

    /// Canonical date string (date-only or full timestamp)
    pub published_at: String,

    pub authors: Vec<AuthorRecord>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Fully-qualified media URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A validated legal document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDocument {
    pub title: String,
    pub slug: String,
}

/// A registry entry for a tag observed in the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: u32,
    pub name: String,
    pub slug: String,
}

/// A blog post whose authors and tags are references into the registries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub title: String,
    pub slug: String,
    pub preview: String,
    pub published_at: String,

    /// Author user ids, as strings, in front-matter order
    pub authors: Vec<String>,

    /// Tag registry ids, as strings, in front-matter order
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Projection of a post onto the fields the search page displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub title: String,
    pub preview: String,
    pub slug: String,
}

impl From<&NormalizedPost> for SearchEntry {
    fn from(post: &NormalizedPost) -> Self {
        Self {
            title: post.title.clone(),
            preview: post.preview.clone(),
            slug: post.slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_literals() {
        assert_eq!(Tag::from_literal("Update"), Some(Tag::Update));
        assert_eq!(Tag::from_literal("Tutorial"), Some(Tag::Tutorial));
        assert_eq!(Tag::from_literal("update"), None);
        assert_eq!(Tag::from_literal("Release"), None);
    }

    #[test]
    fn test_tag_slugs() {
        for tag in Tag::ALL {
            assert_eq!(tag.slug(), tag.name().to_lowercase().replace(' ', "-"));
        }
    }

    #[test]
    fn test_tag_serializes_as_literal() {
        let json = serde_json::to_string(&vec![Tag::Development, Tag::Update]).unwrap();
        assert_eq!(json, r#"["Development","Update"]"#);
    }

    #[test]
    fn test_post_omits_missing_image() {
        let post = NormalizedPost {
            id: Some(1),
            title: "Hello".into(),
            slug: "hello".into(),
            preview: "Hi".into(),
            published_at: "2024-01-01".into(),
            authors: vec!["2".into()],
            tags: vec![],
            image: None,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("image").is_none());
        assert_eq!(json["authors"][0], "2");
    }
}
