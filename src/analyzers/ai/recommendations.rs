//! Follow-up recommendations
//!
//! Four more prompts over the same [`InsightContext`]: AdSense readiness,
//! fixes for the broken links found, candidate title and meta description
//! rewrites, and a refined version of the page's text sample. They run
//! concurrently with the insight prompts and degrade independently.

use super::{
    adsense_prompt, broken_links_prompt, clean_list, parse_json_reply, refine_prompt,
    request_structured, seo_rewrite_prompt, to_json, unavailable, AiInsightAggregator,
    GenerativeError, InsightContext, ADSENSE_SHAPE, MAX_META_DESCRIPTION_CHARS, MAX_TITLE_CHARS,
    REFINEMENT_SHAPE, REWRITES_SHAPE,
};
use crate::orchestrator::Language;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A generated value, or the reason it is missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Generated<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> Generated<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdsenseReadiness {
    pub assessment: String,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoRewrites {
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub meta_descriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRefinement {
    pub refined_text: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Output of [`AiInsightAggregator::recommend`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiRecommendations {
    pub adsense_readiness: Generated<AdsenseReadiness>,
    /// Empty when no link is broken
    pub broken_link_suggestions: Generated<Vec<String>>,
    pub seo_rewrites: Generated<SeoRewrites>,
    pub content_refinement: Generated<ContentRefinement>,
    pub error: Option<String>,
}

impl AiRecommendations {
    /// Every part unavailable for the same reason
    pub fn unavailable(reason: &str) -> Self {
        Self {
            adsense_readiness: Generated::Unavailable(unavailable(reason)),
            broken_link_suggestions: Generated::Unavailable(unavailable(reason)),
            seo_rewrites: Generated::Unavailable(unavailable(reason)),
            content_refinement: Generated::Unavailable(unavailable(reason)),
            error: Some(reason.to_string()),
        }
    }
}

impl AiInsightAggregator {
    /// Requests the four recommendations concurrently
    ///
    /// No request is made for broken-link fixes when nothing is broken, nor
    /// for refinement when the page had no text.
    pub async fn recommend(
        &self,
        context: &InsightContext,
        language: Language,
    ) -> AiRecommendations {
        let Some(generator) = self.generator.as_deref() else {
            return AiRecommendations::unavailable("no generative-text API key configured");
        };

        let url = context.url.as_str();
        let adsense_prompt = adsense_prompt(url, &to_json(context), language);
        let rewrite_prompt = seo_rewrite_prompt(
            url,
            context.seo.title.as_deref(),
            context.seo.meta_description.as_deref(),
            &context.seo.top_keywords,
            language,
        );
        let links_prompt = (!context.broken_links.is_empty())
            .then(|| broken_links_prompt(url, &context.broken_links, language));
        let refine_prompt = (!context.text_sample.trim().is_empty())
            .then(|| refine_prompt(&context.text_sample, language));

        let broken_links = async {
            match &links_prompt {
                Some(prompt) => generator
                    .generate(prompt)
                    .await
                    .and_then(|reply| parse_numbered_list(&reply)),
                None => Ok(Vec::new()),
            }
        };
        let refinement = async {
            match &refine_prompt {
                Some(prompt) => {
                    request_structured(generator, prompt, REFINEMENT_SHAPE, parse_refinement)
                        .await
                        .map(Some)
                }
                None => Ok(None),
            }
        };

        let (adsense, broken_links, rewrites, refinement) = tokio::join!(
            request_structured(generator, &adsense_prompt, ADSENSE_SHAPE, parse_adsense),
            broken_links,
            request_structured(generator, &rewrite_prompt, REWRITES_SHAPE, parse_rewrites),
            refinement,
        );

        let mut failures = Vec::new();
        let adsense_readiness = settle("adsense_readiness", adsense, &mut failures);
        let broken_link_suggestions =
            settle("broken_link_suggestions", broken_links, &mut failures);
        let seo_rewrites = settle("seo_rewrites", rewrites, &mut failures);
        let content_refinement = match settle("content_refinement", refinement, &mut failures) {
            Generated::Ready(Some(refined)) => Generated::Ready(refined),
            Generated::Ready(None) => {
                Generated::Unavailable(unavailable("no text extracted from the page"))
            }
            Generated::Unavailable(reason) => Generated::Unavailable(reason),
        };

        if !failures.is_empty() {
            warn!("AI recommendations for {} partially failed: {}", url, failures.join("; "));
        }

        AiRecommendations {
            adsense_readiness,
            broken_link_suggestions,
            seo_rewrites,
            content_refinement,
            error: (!failures.is_empty()).then(|| failures.join("; ")),
        }
    }
}

fn settle<T>(
    part: &str,
    outcome: Result<T, GenerativeError>,
    failures: &mut Vec<String>,
) -> Generated<T> {
    match outcome {
        Ok(value) => Generated::Ready(value),
        Err(e) => {
            failures.push(format!("{}: {}", part, e));
            Generated::Unavailable(unavailable(&e.to_string()))
        }
    }
}

fn parse_adsense(reply: &str) -> Result<AdsenseReadiness, GenerativeError> {
    let payload: AdsenseReadiness = parse_json_reply(reply)?;
    let assessment = payload.assessment.trim().to_string();
    if assessment.is_empty() {
        return Err(GenerativeError::Malformed("empty assessment".to_string()));
    }

    Ok(AdsenseReadiness {
        assessment,
        improvement_areas: clean_list(payload.improvement_areas),
    })
}

/// Keeps only candidates within the length limits the prompt asked for
fn parse_rewrites(reply: &str) -> Result<SeoRewrites, GenerativeError> {
    let payload: SeoRewrites = parse_json_reply(reply)?;

    let within = |limit: usize| move |text: &String| text.chars().count() <= limit;
    let rewrites = SeoRewrites {
        titles: clean_list(payload.titles)
            .into_iter()
            .filter(within(MAX_TITLE_CHARS))
            .collect(),
        meta_descriptions: clean_list(payload.meta_descriptions)
            .into_iter()
            .filter(within(MAX_META_DESCRIPTION_CHARS))
            .collect(),
    };

    if rewrites.titles.is_empty() && rewrites.meta_descriptions.is_empty() {
        return Err(GenerativeError::Malformed(
            "no titles or meta descriptions within length limits".to_string(),
        ));
    }
    Ok(rewrites)
}

fn parse_refinement(reply: &str) -> Result<ContentRefinement, GenerativeError> {
    let payload: ContentRefinement = parse_json_reply(reply)?;
    let refined_text = payload.refined_text.trim().to_string();
    if refined_text.is_empty() {
        return Err(GenerativeError::Malformed("empty refined text".to_string()));
    }

    Ok(ContentRefinement {
        refined_text,
        suggestions: clean_list(payload.suggestions),
    })
}

/// Collects the items of a numbered or bulleted list, dropping other lines
pub fn parse_numbered_list(reply: &str) -> Result<Vec<String>, GenerativeError> {
    let items: Vec<String> = reply
        .lines()
        .filter_map(list_item)
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        return Err(GenerativeError::Malformed("no list items in reply".to_string()));
    }
    Ok(items)
}

fn list_item(line: &str) -> Option<&str> {
    let line = line.trim();

    let rest = match line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        Some(rest) => rest,
        None => {
            let after_digits = line.trim_start_matches(char::is_numeric);
            if after_digits.len() == line.len() {
                return None;
            }
            after_digits
                .strip_prefix('.')
                .or_else(|| after_digits.strip_prefix(')'))?
        }
    };

    Some(rest.trim()).filter(|item| !item.is_empty())
}
