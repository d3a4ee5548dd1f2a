//! Built-in page templates using Tera template engine
//!
//! Templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::html_escape;

/// Template renderer with the embedded templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Markup from the CMS is injected as-is; everything else goes
        // through the `esc` filter explicitly.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("wp/layout.html")),
            ("vehicle.html", include_str!("wp/vehicle.html")),
            ("not_found.html", include_str!("wp/not_found.html")),
            ("error.html", include_str!("wp/error.html")),
        ])?;

        tera.register_filter("esc", esc_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape HTML special characters (leaves `/` alone, unlike `escape`)
fn esc_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::Null => String::new(),
        tera::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(html_escape(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub language: String,
}

/// An anchor with a plain-text label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkData {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroImage {
    pub src: String,
    pub alt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_data() -> ConfigData {
        ConfigData {
            title: "Vehicles & More".to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_not_found_escapes_path() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("config", &config_data());
        context.insert("path", "/vehicles/<script>");
        let html = renderer.render("not_found.html", &context).unwrap();
        assert!(html.contains("<title>Not found | Vehicles &amp; More</title>"));
        assert!(html.contains("/vehicles/&lt;script&gt;"));
        assert!(html.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn test_language_is_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "Vehicles".to_string(),
                language: r#"en"><script>"#.to_string(),
            },
        );
        let html = renderer.render("error.html", &context).unwrap();
        assert!(html.contains(r#"<html lang="en&quot;&gt;&lt;script&gt;">"#));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_esc_filter() {
        let args = HashMap::new();
        let out = esc_filter(&tera::Value::String("a/\"b\"".into()), &args).unwrap();
        assert_eq!(out, tera::Value::String("a/&quot;b&quot;".into()));
        let out = esc_filter(&tera::Value::Null, &args).unwrap();
        assert_eq!(out, tera::Value::String(String::new()));
    }
}
