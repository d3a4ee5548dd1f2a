//! Render one detail page to stdout

use anyhow::Result;

use crate::WpFront;

/// Print the full HTML document for `slug`
pub fn run(site: &WpFront, slug: &str) -> Result<()> {
    println!("{}", document(site, slug)?);
    Ok(())
}

/// The document `run` prints; an unknown slug is an error
pub fn document(site: &WpFront, slug: &str) -> Result<String> {
    match site.render(slug)? {
        Some(html) => Ok(html),
        None => anyhow::bail!("No entry with slug: {}", slug),
    }
}
