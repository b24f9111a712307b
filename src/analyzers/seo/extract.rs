//! HTML extraction for SEO analysis
//!
//! This module parses a fetched page and pulls out:
//! - Title, meta description and H1-H6 headings
//! - Every hyperlink, resolved, classified and deduplicated
//! - Image alt-text classification
//! - Visible body text (script, style, noscript and template excluded)
//!
//! Everything returned is owned so the parsed document can be dropped before
//! any network I/O starts.

use crate::url::{is_same_site, normalize_link};
use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Elements whose text is never rendered
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Owned view of everything the SEO analyzer needs from a page
#[derive(Debug, Clone, Default)]
pub struct PageElements {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub headings: Headings,
    pub links: Vec<DiscoveredLink>,
    pub images: ImageAltSummary,
    /// Visible body text, whitespace-joined
    pub text: String,
}

/// Non-empty heading texts per level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    fn level_mut(&mut self, level: u8) -> Option<&mut Vec<String>> {
        match level {
            1 => Some(&mut self.h1),
            2 => Some(&mut self.h2),
            3 => Some(&mut self.h3),
            4 => Some(&mut self.h4),
            5 => Some(&mut self.h5),
            6 => Some(&mut self.h6),
            _ => None,
        }
    }
}

/// A hyperlink found on the page, after resolution and deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Normalized absolute URL
    pub url: Url,
    pub is_internal: bool,
}

/// Alt-text classification of every `<img>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImageAltSummary {
    pub total: usize,
    pub missing_alt: usize,
    pub empty_alt: usize,
    pub present_alt: usize,
}

impl ImageAltSummary {
    /// Missing plus empty alt attributes
    pub fn issues(&self) -> usize {
        self.missing_alt + self.empty_alt
    }
}

/// Parses HTML and extracts SEO elements
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - Final URL of the page, used to resolve relative links
///
/// # Example
///
/// ```
/// use sitelens::analyzers::seo::extract_elements;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><h1>Hi</h1><a href="/a">A</a></body></html>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let elements = extract_elements(html, &page);
/// assert_eq!(elements.title.as_deref(), Some("Test"));
/// assert_eq!(elements.links.len(), 1);
/// ```
pub fn extract_elements(html: &str, page_url: &Url) -> PageElements {
    let document = Html::parse_document(html);
    let base_url = extract_base_url(&document, page_url);

    PageElements {
        title: extract_title(&document),
        meta_description: extract_meta_description(&document),
        headings: extract_headings(&document),
        links: extract_links(&document, &base_url, page_url),
        images: classify_images(&document),
        text: visible_text(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn extract_meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name]").ok()?;

    document
        .select(&selector)
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
}

fn extract_headings(document: &Html) -> Headings {
    let mut headings = Headings::default();

    let Ok(selector) = Selector::parse("h1, h2, h3, h4, h5, h6") else {
        return headings;
    };

    for element in document.select(&selector) {
        let level = element.value().name()[1..].parse::<u8>().unwrap_or(0);
        let text = collapse_whitespace(&element.text().collect::<String>());
        if text.is_empty() {
            continue;
        }
        if let Some(bucket) = headings.level_mut(level) {
            bucket.push(text);
        }
    }

    headings
}

/// Honours `<base href>`; falls back to the page URL
fn extract_base_url(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|base| base.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

/// Extracts, resolves and deduplicates every `<a href>` on the page
fn extract_links(document: &Html, base_url: &Url, page_url: &Url) -> Vec<DiscoveredLink> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute) = resolve_link(href, base_url) else {
            continue;
        };

        let normalized = normalize_link(&absolute);
        if seen.insert(normalized.to_string()) {
            links.push(DiscoveredLink {
                is_internal: is_same_site(&normalized, page_url),
                url: normalized,
            });
        }
    }

    links
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: and data: schemes
/// - Fragment-only links (same page anchors)
/// - Invalid URLs or non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

fn classify_images(document: &Html) -> ImageAltSummary {
    let mut summary = ImageAltSummary::default();

    let Ok(selector) = Selector::parse("img") else {
        return summary;
    };

    for img in document.select(&selector) {
        summary.total += 1;
        match img.value().attr("alt") {
            None => summary.missing_alt += 1,
            Some(alt) if alt.trim().is_empty() => summary.empty_alt += 1,
            Some(_) => summary.present_alt += 1,
        }
    }

    summary
}

/// Collects rendered body text
fn visible_text(document: &Html) -> String {
    let Some(body) = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
    else {
        return String::new();
    };

    let mut parts: Vec<&str> = Vec::new();
    for node in body.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().filter_map(ElementRef::wrap).any(|element| {
            HIDDEN_TEXT_TAGS.contains(&element.value().name())
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    collapse_whitespace(&parts.join(" "))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
