//! `robots.txt` and `sitemap.xml`.
//!
//! Both are rendered from configuration on every request; they are small
//! and the config is immutable.

use std::fmt::Write;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::config::{SeoConfig, SiteIdentity};
use crate::http::server::AppState;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Lower-case, with runs of anything non-alphanumeric collapsed to '-'.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn robots_txt(base_url: &str, api_prefix: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: {}/\n\nSitemap: {}/sitemap.xml\n",
        api_prefix.trim_end_matches('/'),
        base_url
    )
}

pub fn sitemap_xml(site: &SiteIdentity, seo: &SeoConfig) -> String {
    let area_pages = site.service_areas.iter().map(|area| {
        (
            format!("/areas/{}", slugify(area)),
            seo.area_change_freq.as_str(),
            seo.area_priority,
        )
    });
    let pages = seo
        .pages
        .iter()
        .map(|p| (p.path.clone(), p.change_freq.as_str(), p.priority))
        .chain(area_pages);

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{}\">", SITEMAP_NS);
    for (path, change_freq, priority) in pages {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", xml_escape(&format!("{}{}", site.base_url, path)));
        if let Some(lastmod) = &seo.last_modified {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", xml_escape(lastmod));
        }
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", xml_escape(change_freq));
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", priority);
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let body = robots_txt(&state.config.site.base_url, &state.config.security.api_prefix);
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let body = sitemap_xml(&state.config.site, &state.config.seo);
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body)
}
