//! AI insight aggregation
//!
//! Projects the other analyzers' results into a language-neutral
//! [`InsightContext`], then runs prompts concurrently against a
//! [`GenerativeText`] collaborator:
//!
//! - the insight itself: an overall summary, structured SEO suggestions and a
//!   content/tone assessment
//! - follow-up recommendations (see [`recommendations`])
//! - article analysis for submitted text (see [`article`])
//!
//! Every part degrades on its own to an `"unavailable: <reason>"` string.

pub mod article;
mod gemini;
mod prompts;
pub mod recommendations;

pub use article::ArticleAnalysis;
pub use gemini::{GeminiClient, GenerativeError, GenerativeText};
pub use prompts::{
    adsense_prompt, article_prompt, broken_links_prompt, json_retry_prompt, refine_prompt,
    seo_rewrite_prompt, seo_suggestions_prompt, summary_prompt, tone_prompt, ArticleAspect,
    ADSENSE_SHAPE, JSON_RETRY_PREFIX, MAX_META_DESCRIPTION_CHARS, MAX_TITLE_CHARS,
    REFINEMENT_SHAPE, REWRITES_SHAPE, SUGGESTIONS_SHAPE,
};
pub use recommendations::{
    AdsenseReadiness, AiRecommendations, ContentRefinement, Generated, SeoRewrites,
};

use crate::analyzers::domain_trust::{AgeYears, DomainTrustResult, SslStatus};
use crate::analyzers::page_speed::PageSpeedResult;
use crate::analyzers::seo::SeoResult;
use crate::analyzers::ux::UxResult;
use crate::analyzers::Reading;
use crate::orchestrator::Language;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Suggestions list, or the reason it is missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Suggestions {
    List(Vec<String>),
    Unavailable(String),
}

/// Output of the insight aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiInsight {
    pub summary: String,
    pub seo_suggestions: Suggestions,
    pub content_tone: String,
    pub error: Option<String>,
}

impl AiInsight {
    /// Every part unavailable for the same reason
    pub fn unavailable(reason: &str) -> Self {
        Self {
            summary: unavailable(reason),
            seo_suggestions: Suggestions::Unavailable(unavailable(reason)),
            content_tone: unavailable(reason),
            error: Some(reason.to_string()),
        }
    }
}

fn unavailable(reason: &str) -> String {
    format!("unavailable: {}", reason)
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainContext {
    pub domain: String,
    pub age_years: AgeYears,
    pub ssl_valid: Option<bool>,
    pub blacklist_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSpeedContext {
    pub performance_score: Reading<u8>,
    pub issues: Reading<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoContext {
    pub score: u8,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub broken_link_count: usize,
    pub image_alt_issues: usize,
    pub top_keywords: Vec<String>,
    /// Heading counts, H1 through H6
    pub heading_counts: [usize; 6],
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UxContext {
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// The numbers, counts and lists the prompts are built from
#[derive(Debug, Clone, Serialize)]
pub struct InsightContext {
    pub url: String,
    pub domain: DomainContext,
    pub page_speed: PageSpeedContext,
    pub seo: SeoContext,
    pub ux: UxContext,
    /// Broken link URLs, at most [`MAX_CONTEXT_BROKEN_LINKS`]
    pub broken_links: Vec<String>,
    pub text_sample: String,
}

/// Broken links carried into prompts
pub const MAX_CONTEXT_BROKEN_LINKS: usize = 25;

impl InsightContext {
    pub fn from_results(
        url: &str,
        seo: &SeoResult,
        ux: &UxResult,
        domain: &DomainTrustResult,
        page_speed: &PageSpeedResult,
    ) -> Self {
        let ssl_valid = match domain.ssl_status {
            SslStatus::Unknown { .. } => None,
            ref status => Some(status.is_valid()),
        };
        let headings = &seo.headings;

        Self {
            url: url.to_string(),
            domain: DomainContext {
                domain: domain.domain.clone(),
                age_years: domain.age_years,
                ssl_valid,
                blacklist_status: "unknown".to_string(),
            },
            page_speed: PageSpeedContext {
                performance_score: page_speed.category_scores.performance.clone(),
                issues: page_speed.issues.clone(),
            },
            seo: SeoContext {
                score: seo.score,
                title: seo.title.clone(),
                meta_description: seo.meta_description.clone(),
                broken_link_count: seo.broken_link_count,
                image_alt_issues: seo.image_alt_issues,
                top_keywords: seo.keyword_density.iter().map(|(w, _)| w.to_string()).collect(),
                heading_counts: [
                    headings.h1.len(),
                    headings.h2.len(),
                    headings.h3.len(),
                    headings.h4.len(),
                    headings.h5.len(),
                    headings.h6.len(),
                ],
                tips: seo.tips.clone(),
            },
            ux: UxContext {
                issues: ux.issues.clone(),
                suggestions: ux.suggestions.clone(),
            },
            broken_links: seo
                .links
                .iter()
                .filter(|link| link.is_broken)
                .take(MAX_CONTEXT_BROKEN_LINKS)
                .map(|link| link.url.clone())
                .collect(),
            text_sample: seo.text_sample.clone(),
        }
    }
}

#[derive(Deserialize)]
struct SuggestionPayload {
    suggestions: Vec<String>,
}

/// Queries the generative collaborator for the three insight parts
#[derive(Clone, Default)]
pub struct AiInsightAggregator {
    generator: Option<Arc<dyn GenerativeText>>,
}

impl std::fmt::Debug for AiInsightAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiInsightAggregator")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl AiInsightAggregator {
    pub fn new(generator: Arc<dyn GenerativeText>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// An aggregator that reports every part unavailable
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn summarize(
        &self,
        url: &str,
        context: &InsightContext,
        language: Language,
    ) -> AiInsight {
        let Some(generator) = self.generator.as_deref() else {
            return AiInsight::unavailable("no generative-text API key configured");
        };

        let context_json = to_json(context);
        let seo_json = to_json(&context.seo);
        let ux_json = to_json(&context.ux.issues);

        let summary_prompt = summary_prompt(url, &context_json, language);
        let seo_prompt = seo_suggestions_prompt(url, &seo_json, language);
        let tone_prompt = tone_prompt(url, &ux_json, &context.text_sample, language);

        let (summary, suggestions, tone) = tokio::join!(
            generator.generate(&summary_prompt),
            request_structured(generator, &seo_prompt, SUGGESTIONS_SHAPE, parse_suggestions),
            generator.generate(&tone_prompt),
        );

        let mut failures = Vec::new();

        let summary = summary.unwrap_or_else(|e| {
            failures.push(format!("summary: {}", e));
            unavailable(&e.to_string())
        });
        let seo_suggestions = match suggestions {
            Ok(list) => Suggestions::List(list),
            Err(e) => {
                failures.push(format!("seo_suggestions: {}", e));
                Suggestions::Unavailable(unavailable(&e.to_string()))
            }
        };
        let content_tone = tone.unwrap_or_else(|e| {
            failures.push(format!("content_tone: {}", e));
            unavailable(&e.to_string())
        });

        if !failures.is_empty() {
            warn!("AI insight for {} partially failed: {}", url, failures.join("; "));
        }

        AiInsight {
            summary,
            seo_suggestions,
            content_tone,
            error: (!failures.is_empty()).then(|| failures.join("; ")),
        }
    }
}

/// Runs a structured prompt, with one corrective retry when the reply does
/// not parse
///
/// Transport and status errors are returned as they are; only a reply that
/// `parse` rejects earns the retry.
async fn request_structured<T>(
    generator: &dyn GenerativeText,
    prompt: &str,
    shape: &str,
    parse: fn(&str) -> Result<T, GenerativeError>,
) -> Result<T, GenerativeError> {
    let reply = generator.generate(prompt).await?;
    match parse(&reply) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!("Structured reply unparseable ({}), retrying once", first);
            let retry = generator
                .generate(&json_retry_prompt(prompt, &reply, shape))
                .await?;
            parse(&retry)
        }
    }
}

/// Deserializes the outermost JSON object in a reply, tolerating code fences
/// and surrounding prose
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, GenerativeError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => return Err(GenerativeError::Malformed("no JSON object in reply".to_string())),
    };

    serde_json::from_str(json).map_err(|e| GenerativeError::Malformed(e.to_string()))
}

/// Parses `{"suggestions": [...]}`
pub fn parse_suggestions(reply: &str) -> Result<Vec<String>, GenerativeError> {
    let payload: SuggestionPayload = parse_json_reply(reply)?;

    let suggestions = clean_list(payload.suggestions);
    if suggestions.is_empty() {
        return Err(GenerativeError::Malformed("empty suggestions list".to_string()));
    }
    Ok(suggestions)
}

/// Trims entries and drops blank ones
fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
