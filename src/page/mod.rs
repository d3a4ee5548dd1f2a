//! Detail page renderer
//!
//! Resolves a content item and the entities it references, then renders the
//! full HTML document for `/vehicles/:slug`.

use anyhow::Result;
use serde::Serialize;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{ContentItem, ContentSource};
use crate::error::FetchError;
use crate::helpers::{listing_url, long_date};
use crate::meta::PageMetadata;
use crate::templates::{ConfigData, HeroImage, LinkData, TemplateRenderer};

/// Everything the vehicle template shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePage {
    pub slug: String,
    /// Title markup, injected as-is
    pub title_html: String,
    /// Long publish date, e.g. "January 15, 2024"
    pub published: String,
    /// Present only when the author resolved with a name
    pub author: Option<LinkData>,
    /// Always shown; empty label when no category resolved
    pub category: LinkData,
    /// Present only when the featured media has a source URL
    pub hero: Option<HeroImage>,
    /// Body markup, injected as-is
    pub content_html: String,
}

/// Assembles [`VehiclePage`]s from a Content Source
pub struct PageRenderer<'a> {
    config: &'a SiteConfig,
    source: &'a dyn ContentSource,
}

impl<'a> PageRenderer<'a> {
    pub fn new(config: &'a SiteConfig, source: &'a dyn ContentSource) -> Self {
        Self { config, source }
    }

    /// Resolve `slug` and its related entities. `Ok(None)` for an unknown slug.
    pub fn assemble(&self, slug: &str) -> Result<Option<VehiclePage>, FetchError> {
        match self.source.item_by_slug(slug)? {
            Some(item) => self.build(item).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch the optional entities for an item, one after another
    pub fn build(&self, item: ContentItem) -> Result<VehiclePage, FetchError> {
        let media = match item.featured_media {
            Some(id) => Some(self.source.media_by_id(id)?),
            None => None,
        };
        let author = match item.author {
            Some(id) => Some(self.source.author_by_id(id)?),
            None => None,
        };
        let category = match item.primary_category() {
            Some(id) => Some(self.source.category_by_id(id)?),
            None => None,
        };

        let title = item.title.as_str();

        Ok(VehiclePage {
            slug: item.slug.clone(),
            title_html: title.to_string(),
            published: long_date(&item.date),
            author: author.filter(|a| !a.name.is_empty()).map(|a| LinkData {
                href: listing_url(self.config, "author", &a.id.to_string()),
                label: a.name,
            }),
            category: LinkData {
                href: listing_url(
                    self.config,
                    "category",
                    &category.as_ref().map(|c| c.id.to_string()).unwrap_or_default(),
                ),
                label: category.map(|c| c.name).unwrap_or_default(),
            },
            hero: media.as_ref().and_then(|m| m.source()).map(|src| HeroImage {
                src: src.to_string(),
                alt: title.to_string(),
            }),
            content_html: item.content.as_str().to_string(),
        })
    }
}

/// Render the full document: head tags from `metadata`, body from `page`
pub fn render_document(
    templates: &TemplateRenderer,
    config: &SiteConfig,
    metadata: &PageMetadata,
    page: &VehiclePage,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("config", &config_data(config));
    context.insert("head_tags", &metadata.to_head_tags());
    context.insert("page", page);
    templates.render("vehicle.html", &context)
}

/// Render the 404 document for `path`
pub fn render_not_found(
    templates: &TemplateRenderer,
    config: &SiteConfig,
    path: &str,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("config", &config_data(config));
    context.insert("path", path);
    templates.render("not_found.html", &context)
}

/// Render the generic failure document
pub fn render_error(templates: &TemplateRenderer, config: &SiteConfig) -> Result<String> {
    let mut context = Context::new();
    context.insert("config", &config_data(config));
    templates.render("error.html", &context)
}

fn config_data(config: &SiteConfig) -> ConfigData {
    ConfigData {
        title: config.title.clone(),
        language: config.language.clone(),
    }
}
