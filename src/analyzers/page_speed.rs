//! PageSpeed Insights client
//!
//! Wraps the v5 `runPagespeed` API. Category scores become integer
//! percentages, Core Web Vitals keep their display strings, and audits scoring
//! below 0.9 are listed as issues. `fetch_or_unavailable` never fails: any
//! error yields the all-`"N/A"` form with the reason attached.

use crate::analyzers::Reading;
use crate::config::PageSpeedConfig;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Audits scoring below this are reported as issues
pub const AUDIT_PASS_SCORE: f64 = 0.9;

const REPORT_BASE: &str = "https://developers.google.com/speed/pagespeed/insights/?url=";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageSpeedError {
    #[error("no PageSpeed API key configured")]
    NotConfigured,

    #[error("PageSpeed API rate limit exceeded")]
    RateLimited,

    #[error("PageSpeed API rejected the key (status {0})")]
    Unauthorized(u16),

    #[error("PageSpeed API unreachable: {0}")]
    Unreachable(String),

    #[error("PageSpeed response malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub performance: Reading<u8>,
    pub accessibility: Reading<u8>,
    pub best_practices: Reading<u8>,
    pub seo: Reading<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoreWebVitals {
    pub largest_contentful_paint: Reading<String>,
    pub cumulative_layout_shift: Reading<String>,
    pub total_blocking_time: Reading<String>,
    pub first_contentful_paint: Reading<String>,
    pub speed_index: Reading<String>,
}

/// Output of the PageSpeed client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSpeedResult {
    pub category_scores: CategoryScores,
    pub core_web_vitals: CoreWebVitals,
    /// Failing audit titles; `"N/A"` when no report was obtained
    pub issues: Reading<Vec<String>>,
    pub report_link: String,
    pub error: Option<String>,
}

impl PageSpeedResult {
    /// The all-`"N/A"` form
    pub fn unavailable(url: &Url, reason: impl Into<String>) -> Self {
        Self {
            category_scores: CategoryScores::default(),
            core_web_vitals: CoreWebVitals::default(),
            issues: Reading::NotAvailable,
            report_link: report_link(url),
            error: Some(reason.into()),
        }
    }
}

/// PageSpeed Insights v5 client
#[derive(Clone)]
pub struct PageSpeedClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    strategy: String,
    timeout: Duration,
}

impl std::fmt::Debug for PageSpeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSpeedClient")
            .field("endpoint", &self.endpoint)
            .field("strategy", &self.strategy)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl PageSpeedClient {
    pub fn new(client: Client, config: &PageSpeedConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            endpoint: config.endpoint.clone(),
            strategy: config.strategy.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Runs an audit
    pub async fn fetch(&self, url: &Url) -> Result<PageSpeedResult, PageSpeedError> {
        let key = self.api_key.as_deref().ok_or(PageSpeedError::NotConfigured)?;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("url", url.as_str()),
                ("key", key),
                ("strategy", self.strategy.as_str()),
                ("category", "PERFORMANCE"),
                ("category", "ACCESSIBILITY"),
                ("category", "BEST_PRACTICES"),
                ("category", "SEO"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PageSpeedError::Unreachable(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(PageSpeedError::RateLimited),
            status @ (StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                return Err(PageSpeedError::Unauthorized(status.as_u16()))
            }
            status if !status.is_success() => {
                return Err(PageSpeedError::Unreachable(format!("status {}", status)))
            }
            _ => {}
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PageSpeedError::Malformed(e.to_string()))?;

        let result = parse_report(url, &body)?;
        info!(
            "PageSpeed for {}: performance {}",
            url, result.category_scores.performance
        );
        Ok(result)
    }

    /// Runs an audit, degrading to the all-`"N/A"` form on any error
    pub async fn fetch_or_unavailable(&self, url: &Url) -> PageSpeedResult {
        match self.fetch(url).await {
            Ok(result) => result,
            Err(e) => {
                if e != PageSpeedError::NotConfigured {
                    warn!("PageSpeed audit for {} failed: {}", url, e);
                }
                PageSpeedResult::unavailable(url, e.to_string())
            }
        }
    }
}

/// Builds the public report link for a URL
pub fn report_link(url: &Url) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(url.as_str().as_bytes()).collect();
    format!("{}{}", REPORT_BASE, encoded)
}

/// Extracts scores, vitals and issues from a `runPagespeed` response
pub fn parse_report(url: &Url, body: &Value) -> Result<PageSpeedResult, PageSpeedError> {
    let lighthouse = body
        .get("lighthouseResult")
        .ok_or_else(|| PageSpeedError::Malformed("missing lighthouseResult".to_string()))?;
    let categories = &lighthouse["categories"];
    let audits = &lighthouse["audits"];

    let category_scores = CategoryScores {
        performance: category_score(categories, "performance"),
        accessibility: category_score(categories, "accessibility"),
        best_practices: category_score(categories, "best-practices"),
        seo: category_score(categories, "seo"),
    };

    let core_web_vitals = CoreWebVitals {
        largest_contentful_paint: display_value(audits, "largest-contentful-paint"),
        cumulative_layout_shift: display_value(audits, "cumulative-layout-shift"),
        total_blocking_time: display_value(audits, "total-blocking-time"),
        first_contentful_paint: display_value(audits, "first-contentful-paint"),
        speed_index: display_value(audits, "speed-index"),
    };

    Ok(PageSpeedResult {
        category_scores,
        core_web_vitals,
        issues: Reading::Value(failing_audits(audits)),
        report_link: report_link(url),
        error: None,
    })
}

fn category_score(categories: &Value, category: &str) -> Reading<u8> {
    categories[category]["score"]
        .as_f64()
        .map(|score| (score.clamp(0.0, 1.0) * 100.0).round() as u8)
        .into()
}

fn display_value(audits: &Value, audit: &str) -> Reading<String> {
    audits[audit]["displayValue"]
        .as_str()
        .map(|value| value.replace('\u{a0}', " "))
        .into()
}

/// Titles of scored audits below the pass mark, deduplicated, by audit id
fn failing_audits(audits: &Value) -> Vec<String> {
    let Some(audits) = audits.as_object() else {
        return Vec::new();
    };

    let mut failing: Vec<(&String, &str)> = audits
        .iter()
        .filter(|(_, audit)| audit["score"].as_f64().is_some_and(|s| s < AUDIT_PASS_SCORE))
        .filter_map(|(id, audit)| audit["title"].as_str().map(|title| (id, title)))
        .collect();
    failing.sort_by(|a, b| a.0.cmp(b.0));

    let mut issues: Vec<String> = Vec::new();
    for (_, title) in failing {
        if !issues.iter().any(|existing| existing == title) {
            issues.push(title.to_string());
        }
    }
    issues
}
