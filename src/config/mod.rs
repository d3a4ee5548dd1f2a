//! Configuration module

mod site;

use std::path::PathBuf;

pub use site::ImagesConfig;
pub use site::RemotePattern;
pub use site::SiteConfig;

/// Error loading the site configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
