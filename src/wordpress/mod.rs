//! WordPress REST API client.
//!
//! Blocking HTTP client for the `wp/v2` endpoints. Every call is a fresh
//! request; nothing is cached between page renders.

mod images;

pub use images::ImageFetcher;

use serde::de::DeserializeOwned;
use std::time::Duration;

use ureq::Agent;

use crate::config::SiteConfig;
use crate::content::{Author, Category, ContentItem, ContentSource, MediaAsset};
use crate::error::FetchError;

/// WordPress REST API client.
pub struct WordPressClient {
    agent: Agent,
    base_url: String,
    post_type: String,
}

impl WordPressClient {
    /// Create a client for `base_url` reading items from the `post_type` collection.
    pub fn new(base_url: &str, post_type: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            post_type: post_type.to_owned(),
        }
    }

    /// Create client from config values.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            &config.wordpress_url,
            &config.post_type,
            Duration::from_secs(config.request_timeout),
        )
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/wp-json/wp/v2", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .agent
            .get(url)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(FetchError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }
}

impl ContentSource for WordPressClient {
    fn item_by_slug(&self, slug: &str) -> Result<Option<ContentItem>, FetchError> {
        let url = format!(
            "{}/{}?slug={}",
            self.api_url(),
            self.post_type,
            crate::helpers::encode_query_value(slug)
        );
        let items: Vec<ContentItem> = self.get_json(&url)?;
        Ok(items.into_iter().next())
    }

    fn media_by_id(&self, id: u64) -> Result<MediaAsset, FetchError> {
        self.get_json(&format!("{}/media/{}", self.api_url(), id))
    }

    fn author_by_id(&self, id: u64) -> Result<Author, FetchError> {
        self.get_json(&format!("{}/users/{}", self.api_url(), id))
    }

    fn category_by_id(&self, id: u64) -> Result<Category, FetchError> {
        self.get_json(&format!("{}/categories/{}", self.api_url(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let client = WordPressClient::new(
            "https://cms.example.com/",
            "vehicles",
            Duration::from_secs(5),
        );
        assert_eq!(client.api_url(), "https://cms.example.com/wp-json/wp/v2");
    }

    #[test]
    fn test_from_config() {
        let mut config = SiteConfig::default();
        config.wordpress_url = "https://cms.example.com".to_string();
        config.post_type = "posts".to_string();
        let client = WordPressClient::from_config(&config);
        assert_eq!(client.post_type, "posts");
        assert_eq!(client.base_url, "https://cms.example.com");
    }
}
