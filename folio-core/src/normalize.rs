//! Deduplication of authors and tags into registries.
//!
//! Posts embed full author records and tag literals. The site artifacts store
//! each author and tag once and have posts refer to them by id.

use crate::models::{AuthorRecord, BlogPost, NormalizedPost, Tag, TagRecord};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Author display names keyed by user id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorRegistry(BTreeMap<u64, String>);

impl AuthorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an author, returning the name previously stored for the id
    pub fn insert(&mut self, author: &AuthorRecord) -> Option<String> {
        self.0
            .insert(author.osu_user_id, author.osu_username.clone())
    }

    pub fn get(&self, id: u64) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.0.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

/// Tags in first-seen order with sequential ids starting at 1
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    records: Vec<TagRecord>,
    ids: HashMap<Tag, u32>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `tag`, assigning the next one if the tag is new
    pub fn intern(&mut self, tag: Tag) -> u32 {
        if let Some(id) = self.ids.get(&tag) {
            return *id;
        }

        let id = self.records.len() as u32 + 1;
        self.records.push(TagRecord {
            id,
            name: tag.name().to_string(),
            slug: tag.slug(),
        });
        self.ids.insert(tag, id);
        id
    }

    pub fn get(&self, id: u32) -> Option<&TagRecord> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.records.get(index)
    }

    /// Records in id order
    pub fn records(&self) -> &[TagRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for TagRegistry {
    /// Serialized as an object from id to record, in id order
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.id, record)?;
        }
        map.end()
    }
}

/// Output of [`normalize`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub authors: AuthorRegistry,
    pub tags: TagRegistry,
    pub posts: Vec<NormalizedPost>,
}

/// Build the author and tag registries and rewrite posts to reference them
///
/// Posts are visited in slice order. Authors sharing an id collapse into one
/// entry (the last name seen wins). Tags receive ids in the order they are
/// first seen. The result depends only on the posts and their order.
pub fn normalize(posts: &[BlogPost]) -> Normalized {
    let mut authors = AuthorRegistry::new();
    let mut tags = TagRegistry::new();

    let posts: Vec<NormalizedPost> = posts
        .iter()
        .map(|post| {
            let author_refs = post
                .authors
                .iter()
                .map(|author| {
                    if let Some(previous) = authors.insert(author) {
                        if previous != author.osu_username {
                            tracing::warn!(
                                "Author {} is named both '{}' and '{}'; using '{}' (post '{}')",
                                author.osu_user_id,
                                previous,
                                author.osu_username,
                                author.osu_username,
                                post.slug
                            );
                        }
                    }
                    author.osu_user_id.to_string()
                })
                .collect();

            let tag_refs = post
                .tags
                .iter()
                .map(|tag| tags.intern(*tag).to_string())
                .collect();

            NormalizedPost {
                id: post.id,
                title: post.title.clone(),
                slug: post.slug.clone(),
                preview: post.preview.clone(),
                published_at: post.published_at.clone(),
                authors: author_refs,
                tags: tag_refs,
                image: post.image.clone(),
            }
        })
        .collect();

    tracing::debug!(
        "Normalized {} authors and {} tags",
        authors.len(),
        tags.len()
    );

    Normalized {
        authors,
        tags,
        posts,
    }
}
