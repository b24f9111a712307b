//! Heuristic UX checks
//!
//! Structural checks only; nothing is rendered. Each check independently adds
//! either an issue or a suggestion.

use crate::fetch::FetchedPage;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::debug;

/// Output of the UX analyzer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UxResult {
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub viewport_present: bool,
    pub error: Option<String>,
}

impl UxResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Stateless heuristic UX analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct UxAnalyzer;

impl UxAnalyzer {
    pub fn analyze(&self, page: &FetchedPage) -> UxResult {
        let result = analyze_html(&page.html_body);
        debug!(
            "UX for {}: {} issue(s), {} suggestion(s)",
            page.final_url,
            result.issues.len(),
            result.suggestions.len()
        );
        result
    }
}

/// Runs every UX check on raw HTML
pub fn analyze_html(html: &str) -> UxResult {
    let document = Html::parse_document(html);
    let mut result = UxResult::default();

    check_viewport(&document, &mut result);
    check_contact(&document, &mut result);
    check_navigation(&document, &mut result);
    check_language(&document, &mut result);

    result
}

fn check_viewport(document: &Html, result: &mut UxResult) {
    let content = select(document, "meta[name]")
        .into_iter()
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.eq_ignore_ascii_case("viewport"))
        })
        .map(|meta| {
            meta.value()
                .attr("content")
                .unwrap_or("")
                .to_ascii_lowercase()
                .replace(' ', "")
        });

    let Some(content) = content else {
        result
            .issues
            .push("Add a viewport meta tag so the page adapts to mobile screens.".to_string());
        return;
    };

    result.viewport_present = true;
    let mut healthy = true;

    if !content.contains("width=device-width") {
        healthy = false;
        result
            .issues
            .push("Set the viewport width to device-width.".to_string());
    }

    let zoom_disabled = content.contains("user-scalable=no")
        || content.contains("user-scalable=0")
        || content
            .split(',')
            .filter_map(|part| part.strip_prefix("maximum-scale="))
            .any(|value| value.parse::<f64>().is_ok_and(|scale| scale <= 1.0));
    if zoom_disabled {
        healthy = false;
        result
            .issues
            .push("Allow users to zoom; avoid user-scalable=no and maximum-scale=1.".to_string());
    }

    if healthy {
        result
            .suggestions
            .push("Viewport meta tag is configured for mobile devices.".to_string());
    }
}

fn check_contact(document: &Html, result: &mut UxResult) {
    let has_form = !select(document, "form").is_empty();
    let has_contact_link = select(document, "a").iter().any(|a| {
        let href = a.value().attr("href").unwrap_or("").to_lowercase();
        let text = a.text().collect::<String>().to_lowercase();
        href.starts_with("mailto:")
            || mentions_contact(&href)
            || mentions_contact(&text)
            || class_mentions(a, &["contact", "feedback"])
    });

    if has_form || has_contact_link {
        result
            .suggestions
            .push("Contact information or form detected, giving users a feedback channel.".to_string());
    } else {
        result
            .issues
            .push("Consider adding a clear contact form or link for feedback and inquiries.".to_string());
    }
}

fn check_navigation(document: &Html, result: &mut UxResult) {
    let landmark = !select(document, "nav, [role=navigation]").is_empty();
    let styled = select(document, "ul, ol, div, a")
        .iter()
        .any(|element| class_mentions(element, &["nav", "menu"]));

    if landmark || styled {
        result
            .suggestions
            .push("Navigation landmarks detected, helping user orientation.".to_string());
    } else {
        result
            .issues
            .push("Add a navigation landmark (<nav>) so users can orient themselves.".to_string());
    }
}

fn check_language(document: &Html, result: &mut UxResult) {
    let declared = select(document, "html")
        .first()
        .and_then(|html| html.value().attr("lang"))
        .is_some_and(|lang| !lang.trim().is_empty());

    if declared {
        result
            .suggestions
            .push("Page language is declared for assistive technologies.".to_string());
    } else {
        result
            .issues
            .push("Declare the page language with a lang attribute on <html>.".to_string());
    }
}

fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn mentions_contact(s: &str) -> bool {
    s.contains("contact") || s.contains("feedback")
}

fn class_mentions(element: &ElementRef<'_>, needles: &[&str]) -> bool {
    element
        .value()
        .classes()
        .any(|class| {
            let class = class.to_lowercase();
            needles.iter().any(|needle| class.contains(needle))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_PAGE: &str = r#"<!doctype html><html lang="en"><head>
        <meta name="viewport" content="width=device-width, initial-scale=1">
        </head><body><nav><a href="/">Home</a></nav>
        <a href="/contact-us">Contact</a></body></html>"#;

    #[test]
    fn test_good_page_has_no_issues() {
        let result = analyze_html(GOOD_PAGE);
        assert!(result.issues.is_empty(), "{:?}", result.issues);
        assert_eq!(result.suggestions.len(), 4);
        assert!(result.viewport_present);
    }

    #[test]
    fn test_bare_page_reports_every_issue() {
        let result = analyze_html("<html><body><p>Hello</p></body></html>");
        assert_eq!(result.issues.len(), 4);
        assert!(result.suggestions.is_empty());
        assert!(!result.viewport_present);
    }

    #[test]
    fn test_viewport_without_device_width() {
        let result = analyze_html(r#"<head><meta name="viewport" content="width=1024"></head>"#);
        assert!(result.viewport_present);
        assert!(result
            .issues
            .contains(&"Set the viewport width to device-width.".to_string()));
    }

    #[test]
    fn test_viewport_zoom_disabled() {
        let html = r#"<head><meta name="viewport" content="width=device-width, maximum-scale=1.0"></head>"#;
        let result = analyze_html(html);
        assert!(result.issues.iter().any(|i| i.starts_with("Allow users to zoom")));

        let html = r#"<head><meta name="viewport" content="width=device-width, user-scalable=no"></head>"#;
        let result = analyze_html(html);
        assert!(result.issues.iter().any(|i| i.starts_with("Allow users to zoom")));

        let html = r#"<head><meta name="viewport" content="width=device-width, maximum-scale=5"></head>"#;
        let result = analyze_html(html);
        assert!(!result.issues.iter().any(|i| i.starts_with("Allow users to zoom")));
    }

    #[test]
    fn test_contact_detection_variants() {
        for html in [
            r#"<body><form action="/subscribe"></form></body>"#,
            r#"<body><a href="mailto:hello@example.com">Email</a></body>"#,
            r#"<body><a href="/help" class="btn-Feedback">Help</a></body>"#,
            r#"<body><a href="/x">Contact us</a></body>"#,
        ] {
            let result = analyze_html(html);
            assert!(
                result.suggestions.iter().any(|s| s.starts_with("Contact information")),
                "no contact detected in {}",
                html
            );
        }
    }

    #[test]
    fn test_navigation_by_role_or_class() {
        let result = analyze_html(r#"<body><div role="navigation"></div></body>"#);
        assert!(result.suggestions.iter().any(|s| s.starts_with("Navigation")));

        let result = analyze_html(r#"<body><ul class="main-menu"><li>A</li></ul></body>"#);
        assert!(result.suggestions.iter().any(|s| s.starts_with("Navigation")));
    }

    #[test]
    fn test_failed_form() {
        let result = UxResult::failed("page unavailable");
        assert!(result.issues.is_empty());
        assert_eq!(result.error.as_deref(), Some("page unavailable"));
    }
}
