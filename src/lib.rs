//! wp-front: a server-rendered front-end for a WordPress vehicle catalogue
//!
//! Detail pages are rendered per request from the WordPress REST API, with
//! head metadata (Open Graph and Twitter cards) derived from the same entry.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod meta;
pub mod page;
pub mod server;
pub mod templates;
pub mod wordpress;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::content::{ContentSource, FixtureSource};
use crate::meta::{MetadataGenerator, PageMetadata};
use crate::page::PageRenderer;
use crate::templates::TemplateRenderer;
use crate::wordpress::WordPressClient;

/// The front-end application
#[derive(Clone)]
pub struct WpFront {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Where the content comes from
    source: Arc<dyn ContentSource>,
}

impl WpFront {
    /// Load `_config.yml` from `base_dir` and talk to the configured WordPress
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config = config::SiteConfig::load_dir(base_dir)?;
        if config.wordpress_url.is_empty() {
            anyhow::bail!("wordpress_url is not set (config file or WORDPRESS_URL)");
        }
        let source = Arc::new(WordPressClient::from_config(&config));
        Ok(Self::with_source(config, source))
    }

    /// Load `_config.yml` from `base_dir` and serve content from a snapshot file
    pub fn with_fixtures<P: AsRef<Path>>(base_dir: P, fixtures: &Path) -> Result<Self> {
        let config = config::SiteConfig::load_dir(base_dir)?;
        let source = Arc::new(FixtureSource::load(fixtures)?);
        Ok(Self::with_source(config, source))
    }

    /// Build from parts
    pub fn with_source(config: config::SiteConfig, source: Arc<dyn ContentSource>) -> Self {
        Self { config, source }
    }

    /// Shared handle to the content source
    pub fn source(&self) -> Arc<dyn ContentSource> {
        self.source.clone()
    }

    /// Head metadata for a slug (empty when it can't be resolved)
    pub fn metadata(&self, slug: &str) -> PageMetadata {
        MetadataGenerator::new(&self.config, self.source.as_ref()).generate(slug)
    }

    /// Full HTML document for a slug, `None` when the slug is unknown
    pub fn render(&self, slug: &str) -> Result<Option<String>> {
        let metadata = self.metadata(slug);
        let Some(page) = PageRenderer::new(&self.config, self.source.as_ref()).assemble(slug)?
        else {
            return Ok(None);
        };
        let templates = TemplateRenderer::new()?;
        let html = page::render_document(&templates, &self.config, &metadata, &page)?;
        Ok(Some(html))
    }
}
