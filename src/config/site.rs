//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ConfigError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,

    // URL
    /// Public origin of this front-end, used for canonical and OG image URLs
    pub site_domain: String,
    /// Path segment the detail pages live under (`/vehicles/:slug`)
    pub route_prefix: String,
    /// Path of the dynamic Open Graph image endpoint
    pub og_endpoint: String,

    // WordPress
    pub wordpress_url: String,
    pub wordpress_hostname: String,
    /// REST collection the detail pages are read from
    pub post_type: String,
    /// Request timeout for the REST client, in seconds
    pub request_timeout: u64,

    // Deployment
    pub admin_path: String,
    #[serde(default)]
    pub images: ImagesConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Vehicles".to_string(),
            language: "en".to_string(),

            site_domain: "http://localhost:4000".to_string(),
            route_prefix: "vehicles".to_string(),
            og_endpoint: "/api/og".to_string(),

            wordpress_url: String::new(),
            wordpress_hostname: String::new(),
            post_type: "vehicles".to_string(),
            request_timeout: 30,

            admin_path: "/admin".to_string(),
            images: ImagesConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `_config.yml` from a directory, falling back to defaults
    pub fn load_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self, ConfigError> {
        let config_path = base_dir.as_ref().join("_config.yml");
        let mut config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            Self::load(&config_path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Override WordPress settings from the deployment environment.
    ///
    /// Takes a lookup function so the environment is read exactly once, at startup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WORDPRESS_URL").filter(|v| !v.is_empty()) {
            self.wordpress_url = url;
        }
        if let Some(host) = lookup("WORDPRESS_HOSTNAME").filter(|v| !v.is_empty()) {
            self.wordpress_hostname = host;
        }
    }

    /// Fill derived settings once all sources have been merged
    pub fn finalize(&mut self) {
        self.site_domain = self.site_domain.trim_end_matches('/').to_string();
        self.wordpress_url = self.wordpress_url.trim_end_matches('/').to_string();
        self.route_prefix = self.route_prefix.trim_matches('/').to_string();
        if !self.admin_path.starts_with('/') {
            self.admin_path = format!("/{}", self.admin_path);
        }

        if self.images.remote_patterns.is_empty() && !self.wordpress_hostname.is_empty() {
            self.images
                .remote_patterns
                .push(RemotePattern::https(&self.wordpress_hostname));
        }
    }

    /// Check the settings that become server routes
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = self.route_prefix.trim_matches('/');
        if prefix.is_empty() {
            return Err(ConfigError::Invalid {
                field: "route_prefix",
                reason: "must not be empty".to_string(),
            });
        }
        if !is_static_path(prefix) {
            return Err(ConfigError::Invalid {
                field: "route_prefix",
                reason: format!("{:?} is not a plain path", self.route_prefix),
            });
        }

        if !self.admin_path.starts_with('/') || !is_static_path(&self.admin_path) {
            return Err(ConfigError::Invalid {
                field: "admin_path",
                reason: format!("{:?} is not an absolute plain path", self.admin_path),
            });
        }
        if self.admin_path == "/_image" {
            return Err(ConfigError::Invalid {
                field: "admin_path",
                reason: "clashes with the image proxy".to_string(),
            });
        }

        Ok(())
    }

    /// Destination of the admin redirect
    pub fn admin_destination(&self) -> String {
        format!("{}/wp-admin", self.wordpress_url)
    }
}

/// Remote image configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    #[serde(default)]
    pub remote_patterns: Vec<RemotePattern>,
}

impl ImagesConfig {
    /// Whether any pattern allows the given absolute URL
    pub fn allows(&self, url: &str) -> bool {
        self.remote_patterns.iter().any(|p| p.matches(url))
    }
}

/// An allow-listed remote image location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemotePattern {
    pub protocol: String,
    pub hostname: String,
    /// Empty means the URL must not carry an explicit port
    pub port: String,
    /// Glob on the path: `/**` matches everything below, `/*` one segment
    pub pathname: String,
}

impl Default for RemotePattern {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
            hostname: String::new(),
            port: String::new(),
            pathname: "/**".to_string(),
        }
    }
}

impl RemotePattern {
    /// Pattern allowing any path on an https host
    pub fn https(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            ..Self::default()
        }
    }

    /// Check an absolute URL against this pattern
    pub fn matches(&self, url: &str) -> bool {
        let Ok(uri) = url.parse::<ureq::http::Uri>() else {
            return false;
        };

        let scheme_ok = uri
            .scheme_str()
            .is_some_and(|s| s.eq_ignore_ascii_case(&self.protocol));
        let host_ok = uri
            .host()
            .is_some_and(|h| !self.hostname.is_empty() && h.eq_ignore_ascii_case(&self.hostname));
        let port_ok = match uri.port_u16() {
            Some(port) => port.to_string() == self.port,
            None => self.port.is_empty(),
        };

        scheme_ok && host_ok && port_ok && path_matches(&self.pathname, uri.path())
    }
}

/// No route parameters, wildcards or whitespace
fn is_static_path(path: &str) -> bool {
    !path.contains(|c: char| c == ':' || c == '*' || c == '{' || c == '}' || c.is_whitespace())
}

fn path_matches(pattern: &str, path: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return path == prefix || path.starts_with(&format!("{}/", prefix));
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path
            .strip_prefix(&format!("{}/", prefix))
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'));
    }
    pattern == path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.post_type, "vehicles");
        assert_eq!(config.og_endpoint, "/api/og");
        assert_eq!(config.request_timeout, 30);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
site_domain: https://cars.example.com/
wordpress_url: https://cms.example.com
images:
  remote_patterns:
    - hostname: media.example.com
      pathname: /wp-content/**
"#;
        let mut config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        config.finalize();
        assert_eq!(config.site_domain, "https://cars.example.com");
        assert_eq!(config.admin_destination(), "https://cms.example.com/wp-admin");
        assert_eq!(config.images.remote_patterns[0].protocol, "https");
        assert_eq!(config.route_prefix, "vehicles");
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = SiteConfig::default();
        config.wordpress_url = "https://old.example.com".to_string();
        config.apply_env(|key| match key {
            "WORDPRESS_URL" => Some("https://cms.example.com/".to_string()),
            "WORDPRESS_HOSTNAME" => Some("cms.example.com".to_string()),
            _ => None,
        });
        config.finalize();
        assert_eq!(config.wordpress_url, "https://cms.example.com");
        assert!(config.images.allows("https://cms.example.com/wp-content/a.jpg"));
    }

    #[test]
    fn test_route_paths_are_normalized() {
        let mut config = SiteConfig::default();
        config.admin_path = "admin".to_string();
        config.route_prefix = "/cars/".to_string();
        config.finalize();
        assert_eq!(config.admin_path, "/admin");
        assert_eq!(config.route_prefix, "cars");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_routes() {
        let mut config = SiteConfig::default();
        config.admin_path = "admin".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "admin_path", .. })
        ));

        let mut config = SiteConfig::default();
        config.admin_path = "/_image".to_string();
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.route_prefix = "/".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "route_prefix", .. })
        ));

        let mut config = SiteConfig::default();
        config.route_prefix = "cars/:id".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_dir_rejects_bad_route() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("_config.yml"), "route_prefix: \"\"\n").unwrap();
        assert!(SiteConfig::load_dir(dir.path()).is_err());
    }

    #[test]
    fn test_load_dir_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load_dir(dir.path()).unwrap();
        assert_eq!(config.admin_path, "/admin");
    }

    #[test]
    fn test_load_dir_with_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("_config.yml"), "title: Garage\n").unwrap();
        let config = SiteConfig::load_dir(dir.path()).unwrap();
        assert_eq!(config.title, "Garage");
    }

    #[test]
    fn test_remote_pattern() {
        let pattern = RemotePattern::https("cms.example.com");
        assert!(pattern.matches("https://cms.example.com/wp-content/uploads/car.jpg"));
        assert!(!pattern.matches("http://cms.example.com/car.jpg"));
        assert!(!pattern.matches("https://evil.example.com/car.jpg"));
        assert!(!pattern.matches("https://cms.example.com:8443/car.jpg"));
        assert!(!pattern.matches("not a url"));
    }

    #[test]
    fn test_path_matches() {
        assert!(path_matches("/**", "/a/b/c"));
        assert!(path_matches("/uploads/**", "/uploads/2024/car.jpg"));
        assert!(!path_matches("/uploads/**", "/uploadsx/car.jpg"));
        assert!(path_matches("/uploads/*", "/uploads/car.jpg"));
        assert!(!path_matches("/uploads/*", "/uploads/2024/car.jpg"));
    }
}
