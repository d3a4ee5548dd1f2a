//! Print the head metadata for a slug

use anyhow::Result;

use crate::WpFront;

/// Print the metadata for `slug` as JSON, or as head tags with `tags`
pub fn run(site: &WpFront, slug: &str, tags: bool) -> Result<()> {
    println!("{}", output(site, slug, tags)?);
    Ok(())
}

/// What `run` prints
pub fn output(site: &WpFront, slug: &str, tags: bool) -> Result<String> {
    let metadata = site.metadata(slug);

    if metadata.is_empty() {
        tracing::warn!("No metadata for slug: {}", slug);
    }

    if tags {
        Ok(metadata.to_head_tags())
    } else {
        Ok(serde_json::to_string_pretty(&metadata)?)
    }
}
