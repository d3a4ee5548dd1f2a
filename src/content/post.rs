//! Content models as served by the WordPress REST API

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Markup supplied by the Content Source.
///
/// Only constructed by deserializing Content Source data, which makes the
/// upstream CMS the sanitization boundary. Templates inject it unescaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Rendered")]
pub struct TrustedHtml(String);

#[derive(Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

impl From<Rendered> for TrustedHtml {
    fn from(r: Rendered) -> Self {
        Self(r.rendered)
    }
}

impl TrustedHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vehicle (or post) entry
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    /// Numeric id
    pub id: u64,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Publication date
    #[serde(deserialize_with = "deserialize_wp_date")]
    pub date: NaiveDateTime,

    /// Rendered title
    #[serde(default)]
    pub title: TrustedHtml,

    /// Rendered excerpt
    #[serde(default)]
    pub excerpt: TrustedHtml,

    /// Rendered body
    #[serde(default)]
    pub content: TrustedHtml,

    /// Featured media id
    #[serde(default, deserialize_with = "deserialize_ref")]
    pub featured_media: Option<u64>,

    /// Author id
    #[serde(default, deserialize_with = "deserialize_ref")]
    pub author: Option<u64>,

    /// Category ids, in CMS order
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub categories: Vec<u64>,
}

impl ContentItem {
    /// First category reference, the only one displayed
    pub fn primary_category(&self) -> Option<u64> {
        self.categories.first().copied()
    }
}

/// An uploaded media file
#[derive(Debug, Clone, Deserialize)]
pub struct MediaAsset {
    pub id: u64,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl MediaAsset {
    /// Source URL, if the asset has a non-empty one
    pub fn source(&self) -> Option<&str> {
        self.source_url.as_deref().filter(|s| !s.is_empty())
    }
}

/// A post author
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// A post category
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// WordPress sends `0` for "none"
fn deserialize_ref<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id: Option<u64> = Option::deserialize(deserializer)?;
    Ok(id.filter(|id| *id != 0))
}

fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Option<Vec<u64>> = Option::deserialize(deserializer)?;
    Ok(ids.unwrap_or_default())
}

/// Accepts `2024-01-15T10:30:00` (the REST format) or a bare `2024-01-15`
fn deserialize_wp_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_wp_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s)))
}

pub(crate) fn parse_wp_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
