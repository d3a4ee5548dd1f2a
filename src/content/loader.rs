//! Content loader - serves content from a local JSON snapshot

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{Author, Category, ContentItem, ContentSource, MediaAsset};
use crate::error::FetchError;

/// Snapshot file layout, entities in REST wire format
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snapshot {
    items: Vec<ContentItem>,
    media: Vec<MediaAsset>,
    authors: Vec<Author>,
    categories: Vec<Category>,
}

/// Content Source backed by a JSON snapshot
#[derive(Debug, Default)]
pub struct FixtureSource {
    items: HashMap<String, ContentItem>,
    media: HashMap<u64, MediaAsset>,
    authors: HashMap<u64, Author>,
    categories: HashMap<u64, Category>,
}

impl FixtureSource {
    /// Load a snapshot file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FetchError> {
        let content = fs::read_to_string(path.as_ref())?;
        let source = Self::from_json(&content)?;
        tracing::info!(
            "Loaded {} items from {:?}",
            source.items.len(),
            path.as_ref()
        );
        Ok(source)
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;

        Ok(Self {
            items: snapshot
                .items
                .into_iter()
                .map(|i| (i.slug.clone(), i))
                .collect(),
            media: snapshot.media.into_iter().map(|m| (m.id, m)).collect(),
            authors: snapshot.authors.into_iter().map(|a| (a.id, a)).collect(),
            categories: snapshot
                .categories
                .into_iter()
                .map(|c| (c.id, c))
                .collect(),
        })
    }
}

impl ContentSource for FixtureSource {
    fn item_by_slug(&self, slug: &str) -> Result<Option<ContentItem>, FetchError> {
        Ok(self.items.get(slug).cloned())
    }

    fn media_by_id(&self, id: u64) -> Result<MediaAsset, FetchError> {
        lookup(&self.media, "media", id)
    }

    fn author_by_id(&self, id: u64) -> Result<Author, FetchError> {
        lookup(&self.authors, "author", id)
    }

    fn category_by_id(&self, id: u64) -> Result<Category, FetchError> {
        lookup(&self.categories, "category", id)
    }
}

fn lookup<T: Clone>(map: &HashMap<u64, T>, kind: &'static str, id: u64) -> Result<T, FetchError> {
    map.get(&id).cloned().ok_or(FetchError::NotFound { kind, id })
}

/// Snapshot used across the crate's tests
#[cfg(test)]
pub(crate) const MUSTANG_SNAPSHOT: &str = r#"{
    "items": [
        {
            "id": 11,
            "slug": "classic-mustang",
            "date": "2024-01-15",
            "title": {"rendered": "1967 Mustang"},
            "excerpt": {"rendered": "<p>A <b>classic</b>.</p>"},
            "content": {"rendered": "<p>Restored <em>fastback</em>.</p>"},
            "featured_media": 7,
            "author": 3,
            "categories": [5]
        },
        {
            "id": 12,
            "slug": "bare-beetle",
            "date": "2023-07-04T08:00:00",
            "title": {"rendered": "Beetle"},
            "excerpt": {"rendered": "  <p>Air-cooled</p>\n"},
            "content": {"rendered": "<p>Bare</p>"},
            "featured_media": 0,
            "author": 0,
            "categories": []
        },
        {
            "id": 13,
            "slug": "no-picture",
            "date": "2023-03-09",
            "title": {"rendered": "Corolla"},
            "excerpt": {"rendered": ""},
            "content": {"rendered": ""},
            "featured_media": 8,
            "author": 3,
            "categories": [99]
        }
    ],
    "media": [
        {"id": 7, "source_url": "https://cms.example.com/wp-content/uploads/mustang.jpg"},
        {"id": 8, "source_url": null}
    ],
    "authors": [{"id": 3, "name": "Jane Doe"}],
    "categories": [{"id": 5, "name": "Classics"}]
}"#;
