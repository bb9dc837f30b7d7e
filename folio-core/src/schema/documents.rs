//! Schemas for each content kind.

use super::rules::{
    date, default_to, integer, list, media, object, one_of, optional, string, DateFormat, Fields,
    Rule, StringRule,
};
use super::{Issues, ValidationError};
use crate::corpus::RawDocument;
use crate::models::{AuthorRecord, BlogPost, ContentKind, LegalDocument, Tag};
use crate::slug::slug_regex;

/// A front matter schema producing one typed document per raw document
pub trait DocumentSchema {
    type Document;

    const KIND: ContentKind;

    /// Validate and transform one document, reporting every failing field
    fn validate(&self, raw: &RawDocument) -> Result<Self::Document, ValidationError>;

    /// Public routing key of a validated document
    fn slug(document: &Self::Document) -> &str;
}

fn title_rule() -> StringRule {
    string().min_len(1).max_len(100)
}

fn slug_rule() -> StringRule {
    string()
        .min_len(1)
        .max_len(100)
        .matches(slug_regex(), "Invalid slug")
}

fn author_rule() -> impl Rule<Output = AuthorRecord> {
    object(|fields| {
        let osu_user_id = fields.field("osu_user_id", &integer().min(1));
        let osu_username = fields.field("osu_username", &string().min_len(1).max_len(15));
        Some(AuthorRecord {
            osu_user_id: osu_user_id?,
            osu_username: osu_username?,
        })
    })
}

/// Schema for blog posts
#[derive(Debug, Clone)]
pub struct BlogSchema {
    date_format: DateFormat,
    media_base_url: String,
}

impl BlogSchema {
    pub fn new(date_format: DateFormat, media_base_url: impl Into<String>) -> Self {
        Self {
            date_format,
            media_base_url: media_base_url.into(),
        }
    }
}

impl DocumentSchema for BlogSchema {
    type Document = BlogPost;

    const KIND: ContentKind = ContentKind::Blog;

    fn validate(&self, raw: &RawDocument) -> Result<BlogPost, ValidationError> {
        let mut issues = Issues::new();
        let mut fields = Fields::root(&raw.front_matter, &mut issues);

        let id = fields.field("id", &optional(integer().min(1)));
        let title = fields.field("title", &title_rule());
        let slug = fields.field("slug", &slug_rule());
        let preview = fields.field("preview", &string().min_len(1).max_len(150));
        let published_at = fields.field("published_at", &date(self.date_format));
        let authors = fields.field("authors", &list(author_rule()));
        let tags = fields.field(
            "tags",
            &default_to(list(one_of(&Tag::ALL, Tag::name)), Vec::new()),
        );
        let image = fields.field("image", &optional(media(self.media_base_url.as_str())));

        let (
            Some(id),
            Some(title),
            Some(slug),
            Some(preview),
            Some(published_at),
            Some(authors),
            Some(tags),
            Some(image),
        ) = (id, title, slug, preview, published_at, authors, tags, image)
        else {
            return Err(ValidationError::new(Self::KIND, &raw.filename, issues));
        };

        Ok(BlogPost {
            id,
            title,
            slug,
            preview,
            published_at,
            authors,
            tags,
            image,
        })
    }

    fn slug(document: &BlogPost) -> &str {
        &document.slug
    }
}

/// Schema for legal documents
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalSchema;

impl DocumentSchema for LegalSchema {
    type Document = LegalDocument;

    const KIND: ContentKind = ContentKind::Legal;

    fn validate(&self, raw: &RawDocument) -> Result<LegalDocument, ValidationError> {
        let mut issues = Issues::new();
        let mut fields = Fields::root(&raw.front_matter, &mut issues);

        let title = fields.field("title", &title_rule());
        let slug = fields.field("slug", &slug_rule());

        let (Some(title), Some(slug)) = (title, slug) else {
            return Err(ValidationError::new(Self::KIND, &raw.filename, issues));
        };

        Ok(LegalDocument { title, slug })
    }

    fn slug(document: &LegalDocument) -> &str {
        &document.slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> RawDocument {
        RawDocument::new("post.md", serde_yaml::from_str(yaml).unwrap())
    }

    fn blog() -> BlogSchema {
        BlogSchema::new(DateFormat::Date, "https://assets.example.com/blog")
    }

    const VALID_POST: &str = r#"
id: 3
title: Welcome
slug: welcome
preview: First post on the new site
published_at: 2024-02-10T18:00:00Z
authors:
  - osu_user_id: 2
    osu_username: peppy
tags: [Announcement, Update]
image: welcome.jpg
"#;

    #[test]
    fn test_valid_post() {
        let post = blog().validate(&raw(VALID_POST)).unwrap();
        assert_eq!(post.id, Some(3));
        assert_eq!(post.slug, "welcome");
        assert_eq!(post.published_at, "2024-02-10");
        assert_eq!(post.tags, vec![Tag::Announcement, Tag::Update]);
        assert_eq!(
            post.image.as_deref(),
            Some("https://assets.example.com/blog/welcome.jpg")
        );
        assert_eq!(
            post.authors,
            vec![AuthorRecord {
                osu_user_id: 2,
                osu_username: "peppy".into()
            }]
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let post = blog()
            .validate(&raw(
                "title: T\nslug: t\npreview: P\npublished_at: 2024-01-01\nauthors: []\n",
            ))
            .unwrap();
        assert_eq!(post.id, None);
        assert!(post.tags.is_empty());
        assert!(post.image.is_none());
    }

    #[test]
    fn test_timestamp_format() {
        let schema = BlogSchema::new(DateFormat::Timestamp, "/media");
        let post = schema.validate(&raw(VALID_POST)).unwrap();
        assert_eq!(post.published_at, "2024-02-10T18:00:00.000Z");
    }

    #[test]
    fn test_bad_slug_names_slug_field() {
        let doc = raw(&VALID_POST.replace("slug: welcome", "slug: Welcome Post"));
        let err = blog().validate(&doc).unwrap_err();
        assert_eq!(err.file, "post.md");
        assert_eq!(err.kind, ContentKind::Blog);
        assert!(err.issues.contains("slug"));
        assert_eq!(
            err.issues.get("slug").unwrap(),
            &["Invalid slug".to_string()]
        );
    }

    #[test]
    fn test_reports_every_failing_field() {
        let doc = raw(
            r#"
id: 0
title: ""
slug: ok
preview: fine
published_at: not a date
authors:
  - osu_user_id: 2
    osu_username: this-name-is-far-too-long
  - osu_username: nobody
tags: [Update, Gossip]
"#,
        );
        let err = blog().validate(&doc).unwrap_err();
        let fields: Vec<_> = err.issues.fields().collect();
        assert_eq!(
            fields,
            vec![
                "authors.0.osu_username",
                "authors.1.osu_user_id",
                "id",
                "published_at",
                "tags.1",
                "title",
            ]
        );
    }

    #[test]
    fn test_missing_everything() {
        let err = blog().validate(&raw("{}")).unwrap_err();
        for field in ["title", "slug", "preview", "published_at", "authors"] {
            assert_eq!(err.issues.get(field).unwrap(), &["is required".to_string()]);
        }
        assert!(!err.issues.contains("tags"));
        assert!(!err.issues.contains("id"));
    }

    fn with_lengths(title: usize, slug: usize, preview: usize) -> RawDocument {
        raw(&format!(
            "title: {}\nslug: {}\npreview: {}\npublished_at: 2024-01-01\nauthors: []\n",
            "t".repeat(title),
            "s".repeat(slug),
            "p".repeat(preview)
        ))
    }

    #[test]
    fn test_length_limits_are_inclusive() {
        let post = blog().validate(&with_lengths(100, 100, 150)).unwrap();
        assert_eq!(post.title.chars().count(), 100);
        assert_eq!(post.slug.len(), 100);
        assert_eq!(post.preview.len(), 150);

        let post = blog().validate(&with_lengths(1, 1, 1)).unwrap();
        assert_eq!(post.slug, "s");
    }

    #[test]
    fn test_one_past_each_limit() {
        let err = blog().validate(&with_lengths(101, 101, 151)).unwrap_err();
        assert_eq!(
            err.issues.get("title").unwrap(),
            &["must be at most 100 characters long, received 101".to_string()]
        );
        assert_eq!(
            err.issues.get("slug").unwrap(),
            &["must be at most 100 characters long, received 101".to_string()]
        );
        assert_eq!(
            err.issues.get("preview").unwrap(),
            &["must be at most 150 characters long, received 151".to_string()]
        );

        let err = blog().validate(&with_lengths(0, 100, 150)).unwrap_err();
        let fields: Vec<_> = err.issues.fields().collect();
        assert_eq!(fields, vec!["title"]);
    }

    #[test]
    fn test_preview_limit_counts_characters() {
        let doc = raw(&format!(
            "title: T\nslug: t\npreview: {}\npublished_at: 2024-01-01\nauthors: []\n",
            "é".repeat(150)
        ));
        assert!(blog().validate(&doc).is_ok());
    }

    #[test]
    fn test_legal_document() {
        let doc = LegalSchema
            .validate(&raw("title: Terms of Service\nslug: terms\nextra: ignored\n"))
            .unwrap();
        assert_eq!(
            doc,
            LegalDocument {
                title: "Terms of Service".into(),
                slug: "terms".into()
            }
        );

        let err = LegalSchema
            .validate(&raw(&format!("title: {}\nslug: a_b\n", "x".repeat(101))))
            .unwrap_err();
        assert_eq!(err.kind, ContentKind::Legal);
        assert!(err.issues.contains("title"));
        assert!(err.issues.contains("slug"));
    }
}
