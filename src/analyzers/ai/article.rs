//! Article analysis for submitted text
//!
//! Four independent questions about an article that is not on any page yet:
//! a suggested structure, keyword ideas, an SEO health check and an
//! originality check.

use super::{
    article_prompt, unavailable, AiInsightAggregator, ArticleAspect, GenerativeError, Suggestions,
};
use crate::orchestrator::Language;
use serde::Serialize;
use tracing::warn;

/// Output of [`AiInsightAggregator::analyze_article`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleAnalysis {
    pub suggested_structure: String,
    pub keyword_suggestions: Suggestions,
    pub content_health: String,
    pub originality: String,
    pub error: Option<String>,
}

impl ArticleAnalysis {
    /// Every part unavailable for the same reason
    pub fn unavailable(reason: &str) -> Self {
        Self {
            suggested_structure: unavailable(reason),
            keyword_suggestions: Suggestions::Unavailable(unavailable(reason)),
            content_health: unavailable(reason),
            originality: unavailable(reason),
            error: Some(reason.to_string()),
        }
    }
}

impl AiInsightAggregator {
    pub async fn analyze_article(&self, article: &str, language: Language) -> ArticleAnalysis {
        let Some(generator) = self.generator.as_deref() else {
            return ArticleAnalysis::unavailable("no generative-text API key configured");
        };

        let structure_prompt = article_prompt(ArticleAspect::Structure, article, language);
        let keywords_prompt = article_prompt(ArticleAspect::Keywords, article, language);
        let health_prompt = article_prompt(ArticleAspect::Health, article, language);
        let originality_prompt = article_prompt(ArticleAspect::Originality, article, language);

        let (structure, keywords, health, originality) = tokio::join!(
            generator.generate(&structure_prompt),
            async {
                generator
                    .generate(&keywords_prompt)
                    .await
                    .and_then(|reply| parse_keyword_list(&reply))
            },
            generator.generate(&health_prompt),
            generator.generate(&originality_prompt),
        );

        let mut failures = Vec::new();
        let mut text_or_unavailable =
            |aspect: ArticleAspect, outcome: Result<String, GenerativeError>| {
                outcome.unwrap_or_else(|e| {
                    failures.push(format!("{}: {}", aspect.name(), e));
                    unavailable(&e.to_string())
                })
            };

        let suggested_structure = text_or_unavailable(ArticleAspect::Structure, structure);
        let content_health = text_or_unavailable(ArticleAspect::Health, health);
        let originality = text_or_unavailable(ArticleAspect::Originality, originality);
        let keyword_suggestions = match keywords {
            Ok(list) => Suggestions::List(list),
            Err(e) => {
                failures.push(format!("{}: {}", ArticleAspect::Keywords.name(), e));
                Suggestions::Unavailable(unavailable(&e.to_string()))
            }
        };

        if !failures.is_empty() {
            warn!("Article analysis partially failed: {}", failures.join("; "));
        }

        ArticleAnalysis {
            suggested_structure,
            keyword_suggestions,
            content_health,
            originality,
            error: (!failures.is_empty()).then(|| failures.join("; ")),
        }
    }
}

/// Splits a comma- or line-separated keyword reply, dropping bullets and
/// case-insensitive duplicates
pub fn parse_keyword_list(reply: &str) -> Result<Vec<String>, GenerativeError> {
    let mut keywords: Vec<String> = Vec::new();

    for raw in reply.split([',', '\n', '،']) {
        let keyword = raw
            .trim()
            .trim_start_matches(['-', '*', '•'])
            .trim()
            .trim_matches('"');
        if keyword.is_empty() {
            continue;
        }
        if !keywords.iter().any(|k| k.to_lowercase() == keyword.to_lowercase()) {
            keywords.push(keyword.to_string());
        }
    }

    if keywords.is_empty() {
        return Err(GenerativeError::Malformed("no keywords in reply".to_string()));
    }
    Ok(keywords)
}
