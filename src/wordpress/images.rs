//! Remote image fetching for the image proxy.
//!
//! Redirects are followed by hand so every hop is checked against the
//! configured remote patterns, not only the first URL.

use std::time::Duration;

use ureq::http::Uri;
use ureq::Agent;

use crate::config::{ImagesConfig, SiteConfig};
use crate::error::FetchError;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 5;

/// Fetches images from allow-listed locations only.
pub struct ImageFetcher {
    agent: Agent,
    images: ImagesConfig,
}

impl ImageFetcher {
    pub fn new(images: ImagesConfig, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .max_redirects(0)
            .build()
            .into();

        Self { agent, images }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            config.images.clone(),
            Duration::from_secs(config.request_timeout),
        )
    }

    /// Whether `url` may be requested at all.
    pub fn allows(&self, url: &str) -> bool {
        self.images.allows(url)
    }

    /// Fetch `url` as raw bytes with its content type.
    pub fn fetch(&self, url: &str) -> Result<(Option<String>, Vec<u8>), FetchError> {
        let mut current = url.to_owned();

        for _ in 0..=MAX_REDIRECTS {
            if !self.allows(&current) {
                return Err(FetchError::Disallowed { url: current });
            }

            tracing::debug!("GET {}", current);
            let response = self.agent.get(&current).call()?;
            let status = response.status().as_u16();

            if response.status().is_redirection() {
                let location = response
                    .headers()
                    .get("location")
                    .and_then(|v| v.to_str().ok())
                    .ok_or(FetchError::HttpResponse {
                        status,
                        body: String::new(),
                    })?;
                current = resolve_location(&current, location).ok_or_else(|| {
                    FetchError::Disallowed {
                        url: location.to_owned(),
                    }
                })?;
                continue;
            }

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let mut body_reader = response.into_body();

            if status >= 400 {
                return Err(FetchError::HttpResponse {
                    status,
                    body: String::new(),
                });
            }

            return Ok((content_type, body_reader.read_to_vec()?));
        }

        Err(FetchError::TooManyRedirects)
    }
}

/// Absolute URL for a `Location` header. Path-relative targets are not followed.
fn resolve_location(base: &str, location: &str) -> Option<String> {
    if let Ok(uri) = location.parse::<Uri>() {
        if uri.scheme().is_some() && uri.authority().is_some() {
            return Some(location.to_owned());
        }
    }

    let base: Uri = base.parse().ok()?;
    let scheme = base.scheme_str()?;
    if location.starts_with("//") {
        return Some(format!("{}:{}", scheme, location));
    }
    if location.starts_with('/') {
        return Some(format!("{}://{}{}", scheme, base.authority()?, location));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemotePattern;

    #[test]
    fn test_resolve_location() {
        let base = "https://cms.example.com/img/a.jpg";
        assert_eq!(
            resolve_location(base, "https://cdn.example.com/b.jpg").as_deref(),
            Some("https://cdn.example.com/b.jpg")
        );
        assert_eq!(
            resolve_location(base, "/img/b.jpg").as_deref(),
            Some("https://cms.example.com/img/b.jpg")
        );
        assert_eq!(
            resolve_location(base, "//other.example.com/c.jpg").as_deref(),
            Some("https://other.example.com/c.jpg")
        );
        assert_eq!(resolve_location(base, "b.jpg"), None);
    }

    #[test]
    fn test_disallowed_url_is_not_requested() {
        let mut images = ImagesConfig::default();
        images
            .remote_patterns
            .push(RemotePattern::https("cms.example.com"));
        let fetcher = ImageFetcher::new(images, Duration::from_secs(1));

        let err = fetcher.fetch("http://127.0.0.1:1/internal").unwrap_err();
        assert!(matches!(err, FetchError::Disallowed { .. }));
    }
}
