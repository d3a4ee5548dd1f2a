//! Page metadata for document head tags
//!
//! Derives title, description and the social preview blocks for a detail
//! page. Lookup failures degrade to empty metadata instead of an error, so a
//! broken CMS never takes the head tags down with it.

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{ContentItem, ContentSource};
use crate::helpers::{full_url_for, html_escape, meta_name, meta_property, strip_html, with_query};

/// Open Graph image width
pub const OG_IMAGE_WIDTH: u32 = 1200;
/// Open Graph image height
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// Head metadata for one page. The default value is the empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_graph: Option<OpenGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterCard>,
}

/// Open Graph block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub og_type: &'static str,
    pub url: String,
    pub images: Vec<OgImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// Twitter card block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Render as `<head>` tags, one per line. Empty metadata renders nothing.
    pub fn to_head_tags(&self) -> String {
        let mut tags = Vec::new();

        if let Some(title) = &self.title {
            tags.push(format!("<title>{}</title>", html_escape(title)));
        }
        if let Some(description) = &self.description {
            tags.push(meta_name("description", description));
        }

        if let Some(og) = &self.open_graph {
            tags.push(meta_property("og:title", &og.title));
            tags.push(meta_property("og:description", &og.description));
            tags.push(meta_property("og:type", og.og_type));
            tags.push(meta_property("og:url", &og.url));
            for image in &og.images {
                tags.push(meta_property("og:image", &image.url));
                tags.push(meta_property("og:image:width", &image.width.to_string()));
                tags.push(meta_property("og:image:height", &image.height.to_string()));
                tags.push(meta_property("og:image:alt", &image.alt));
            }
        }

        if let Some(card) = &self.twitter {
            tags.push(meta_name("twitter:card", card.card));
            tags.push(meta_name("twitter:title", &card.title));
            tags.push(meta_name("twitter:description", &card.description));
            for image in &card.images {
                tags.push(meta_name("twitter:image", image));
            }
        }

        tags.join("\n")
    }
}

/// Builds [`PageMetadata`] for detail pages
pub struct MetadataGenerator<'a> {
    config: &'a SiteConfig,
    source: &'a dyn ContentSource,
}

impl<'a> MetadataGenerator<'a> {
    pub fn new(config: &'a SiteConfig, source: &'a dyn ContentSource) -> Self {
        Self { config, source }
    }

    /// Resolve `slug` and derive its metadata; empty when it can't be resolved
    pub fn generate(&self, slug: &str) -> PageMetadata {
        match self.source.item_by_slug(slug) {
            Ok(Some(item)) => self.describe(&item),
            Ok(None) => {
                tracing::debug!("No item for slug {:?}, empty metadata", slug);
                PageMetadata::default()
            }
            Err(e) => {
                tracing::warn!("Metadata lookup for {:?} failed: {}", slug, e);
                PageMetadata::default()
            }
        }
    }

    /// Derive metadata from an already fetched item
    pub fn describe(&self, item: &ContentItem) -> PageMetadata {
        let title = item.title.as_str().to_string();
        let description = strip_html(item.excerpt.as_str());
        let image_url = self.og_image_url(&title, &description);

        PageMetadata {
            title: Some(title.clone()),
            description: Some(description.clone()),
            open_graph: Some(OpenGraph {
                title: title.clone(),
                description: description.clone(),
                og_type: "article",
                url: full_url_for(self.config, &item.slug),
                images: vec![OgImage {
                    url: image_url.clone(),
                    width: OG_IMAGE_WIDTH,
                    height: OG_IMAGE_HEIGHT,
                    alt: title.clone(),
                }],
            }),
            twitter: Some(TwitterCard {
                card: "summary_large_image",
                title,
                description,
                images: vec![image_url],
            }),
        }
    }

    /// URL of the dynamic image endpoint for this title and description
    pub fn og_image_url(&self, title: &str, description: &str) -> String {
        let endpoint = format!(
            "{}/{}",
            self.config.site_domain.trim_end_matches('/'),
            self.config.og_endpoint.trim_start_matches('/')
        );
        with_query(&endpoint, &[("title", title), ("description", description)])
    }
}
