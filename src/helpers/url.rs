//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Bytes left as-is in `application/x-www-form-urlencoded` values
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Generate a path under the detail-page prefix
///
/// # Examples
/// ```ignore
/// url_for(&config, "classic-mustang") // -> "/vehicles/classic-mustang"
/// url_for(&config, "") // -> "/vehicles/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let prefix = config.route_prefix.trim_matches('/');
    let path = path.trim_start_matches('/');

    if prefix.is_empty() {
        format!("/{}", path)
    } else {
        format!("/{}/{}", prefix, path)
    }
}

/// Generate a full URL including the site domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "classic-mustang") // -> "https://example.com/vehicles/classic-mustang"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!(
        "{}{}",
        config.site_domain.trim_end_matches('/'),
        url_for(config, path)
    )
}

/// Listing page filtered by one query parameter, e.g. `/vehicles/?category=5`
pub fn listing_url(config: &SiteConfig, key: &str, value: &str) -> String {
    format!(
        "{}?{}={}",
        url_for(config, ""),
        key,
        encode_query_value(value)
    )
}

/// Encode a query value the way a browser form does (space becomes `+`)
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, FORM_VALUE)
        .to_string()
        .replace("%20", "+")
}

/// Append query parameters to a base URL, in order
pub fn with_query(base: &str, params: &[(&str, &str)]) -> String {
    let mut url = base.to_string();
    for (i, (key, value)) in params.iter().enumerate() {
        url.push(if i == 0 && !base.contains('?') { '?' } else { '&' });
        url.push_str(&encode_query_value(key));
        url.push('=');
        url.push_str(&encode_query_value(value));
    }
    url
}
