//! SEO analyzer
//!
//! Extracts on-page SEO elements, probes every discovered link with bounded
//! concurrency, computes keyword density and scores the page.

mod extract;
mod keywords;
mod links;
mod scoring;

pub use extract::{
    extract_elements, resolve_link, DiscoveredLink, Headings, ImageAltSummary, PageElements,
};
pub use keywords::{
    keyword_density, tokenize, KeywordDensity, DENSITY_THRESHOLD, MIN_TOKENS_FOR_DENSITY,
    TOP_KEYWORDS,
};
pub use links::{check_links, LinkRecord};
pub use scoring::{compute_score, ExtendedInputs, ScoreInputs, SeoScore};

use crate::config::Config;
use crate::fetch::{FetchedPage, LinkHealthChecker};
use crate::orchestrator::Language;
use crate::robots::{SiteFileProbe, SiteFiles};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Characters of body text kept for downstream prompts
pub const TEXT_SAMPLE_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentLength {
    pub words: usize,
    pub characters: usize,
}

/// Output of the SEO analyzer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeoResult {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub headings: Headings,
    pub keyword_density: KeywordDensity,
    pub links: Vec<LinkRecord>,
    pub internal_link_count: usize,
    pub external_link_count: usize,
    pub broken_link_count: usize,
    pub image_alt_issues: usize,
    pub images: ImageAltSummary,
    pub content_length: ContentLength,
    /// `null` when extended checks are disabled
    pub robots_txt_present: Option<bool>,
    pub sitemap_present: Option<bool>,
    /// Whether robots.txt lets generic crawlers fetch this page; `null`
    /// without extended checks or without a robots.txt
    pub crawl_allowed: Option<bool>,
    pub text_sample: String,
    pub score: u8,
    pub tips: Vec<String>,
    pub error: Option<String>,
}

impl SeoResult {
    /// The `{error}` form used when no page is available
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Analyzes fetched pages for on-page SEO
#[derive(Debug, Clone)]
pub struct SeoAnalyzer {
    link_checker: LinkHealthChecker,
    site_files: Option<SiteFileProbe>,
    max_links_checked: usize,
    max_concurrent_probes: usize,
}

impl SeoAnalyzer {
    pub fn new(client: Client, config: &Config) -> Self {
        let site_files = config.seo.extended_checks.then(|| {
            SiteFileProbe::new(
                client.clone(),
                Duration::from_secs(config.seo.site_file_timeout_secs),
            )
        });

        Self {
            link_checker: LinkHealthChecker::new(
                client,
                Duration::from_secs(config.links.timeout_secs),
            ),
            site_files,
            max_links_checked: config.links.max_links_checked,
            max_concurrent_probes: config.links.max_concurrent_probes,
        }
    }

    /// Runs the full SEO analysis on a fetched page
    ///
    /// Never fails: collaborator problems (unreachable links, missing site
    /// files) are reflected in the result fields.
    pub async fn analyze(&self, page: &FetchedPage, language: Language) -> SeoResult {
        // The parsed document is not Send; it is dropped before the first await.
        let elements = extract_elements(&page.html_body, &page.final_url);

        let tokens = tokenize(&elements.text, language);
        let keyword_density = keyword_density(&tokens);
        let content_length = ContentLength {
            words: elements.text.split_whitespace().count(),
            characters: elements.text.chars().count(),
        };
        let text_sample: String = elements.text.chars().take(TEXT_SAMPLE_CHARS).collect();

        let link_count = elements.links.len();
        let (links, site_files) = tokio::join!(
            check_links(
                &self.link_checker,
                elements.links,
                self.max_links_checked,
                self.max_concurrent_probes,
            ),
            self.probe_site_files(page),
        );

        let internal_link_count = links.iter().filter(|l| l.is_internal).count();
        let broken_link_count = links.iter().filter(|l| l.is_broken).count();

        let scored = compute_score(&ScoreInputs {
            title: elements.title.as_deref(),
            meta_description: elements.meta_description.as_deref(),
            h1_count: elements.headings.h1.len(),
            broken_links: broken_link_count,
            alt_issues: elements.images.issues(),
            has_keywords: !keyword_density.is_empty(),
            extended: site_files.as_ref().map(|files| ExtendedInputs {
                word_count: content_length.words,
                robots_txt_present: files.robots_txt_present,
                sitemap_present: files.sitemap_present,
            }),
        });

        info!(
            "SEO for {}: score {}, {} link(s), {} broken",
            page.final_url, scored.score, link_count, broken_link_count
        );

        SeoResult {
            title: elements.title,
            meta_description: elements.meta_description,
            headings: elements.headings,
            keyword_density,
            internal_link_count,
            external_link_count: links.len() - internal_link_count,
            broken_link_count,
            links,
            image_alt_issues: elements.images.issues(),
            images: elements.images,
            content_length,
            robots_txt_present: site_files.as_ref().map(|f| f.robots_txt_present),
            sitemap_present: site_files.as_ref().map(|f| f.sitemap_present),
            crawl_allowed: site_files.as_ref().and_then(|f| f.target_allowed),
            text_sample,
            score: scored.score,
            tips: scored.tips,
            error: None,
        }
    }

    async fn probe_site_files(&self, page: &FetchedPage) -> Option<SiteFiles> {
        let probe = self.site_files.as_ref()?;
        let files = probe.probe(&page.final_url).await;
        debug!("Extended checks: {:?}", files);
        Some(files)
    }
}
