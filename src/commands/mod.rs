//! CLI command implementations

pub mod meta;
pub mod render;
