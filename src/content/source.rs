//! The Content Source seam

use super::{Author, Category, ContentItem, MediaAsset};
use crate::error::FetchError;

/// Lookups against the system of record.
///
/// Calls are blocking; async callers run them on the blocking pool.
pub trait ContentSource: Send + Sync {
    /// Find an item by slug. `Ok(None)` when nothing matches.
    fn item_by_slug(&self, slug: &str) -> Result<Option<ContentItem>, FetchError>;

    fn media_by_id(&self, id: u64) -> Result<MediaAsset, FetchError>;

    fn author_by_id(&self, id: u64) -> Result<Author, FetchError>;

    fn category_by_id(&self, id: u64) -> Result<Category, FetchError>;
}
