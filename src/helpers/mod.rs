//! Helper functions for templates
//!
//! URL building, HTML escaping and tag stripping, and date formatting
//! shared by the metadata generator and the page renderer.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
