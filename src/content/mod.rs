//! Content module - entity models and the sources they are fetched from

pub mod loader;
mod post;
mod source;

pub use loader::FixtureSource;
pub use post::{Author, Category, ContentItem, MediaAsset, TrustedHtml};
pub use source::ContentSource;
