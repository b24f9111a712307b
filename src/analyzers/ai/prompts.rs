//! Prompt builders
//!
//! Every prompt ends with an instruction naming the response language.

use crate::orchestrator::Language;

/// Marker the corrective prompt opens with
pub const JSON_RETRY_PREFIX: &str = "Your previous reply was not valid JSON.";

pub const SUGGESTIONS_SHAPE: &str = r#"{"suggestions": ["...", "..."]}"#;
pub const ADSENSE_SHAPE: &str = r#"{"assessment": "...", "improvement_areas": ["...", "..."]}"#;
pub const REWRITES_SHAPE: &str = r#"{"titles": ["...", "..."], "meta_descriptions": ["...", "..."]}"#;
pub const REFINEMENT_SHAPE: &str = r#"{"refined_text": "...", "suggestions": ["...", "..."]}"#;

/// Longest suggested title, in characters
pub const MAX_TITLE_CHARS: usize = 60;
/// Longest suggested meta description, in characters
pub const MAX_META_DESCRIPTION_CHARS: usize = 160;

pub fn summary_prompt(url: &str, context_json: &str, language: Language) -> String {
    format!(
        "Based on the following website analysis data for {url}, write a concise overall summary.\n\
         Highlight the main strengths, weaknesses and the most critical areas for improvement.\n\
         Keep it understandable for a non-technical reader.\n\n\
         Analysis data:\n{context_json}\n\n{}",
        respond_in(language)
    )
}

pub fn seo_suggestions_prompt(url: &str, seo_json: &str, language: Language) -> String {
    format!(
        "Based on the following SEO data for {url}, give specific and actionable improvement suggestions.\n\
         Cover title tags, meta descriptions, image alt text, broken links, keyword usage and heading structure.\n\
         Give between 3 and 5 suggestions.\n\
         Reply with JSON only, exactly of the form {SUGGESTIONS_SHAPE}.\n\n\
         SEO data:\n{seo_json}\n\n{}",
        respond_in(language)
    )
}

/// The one corrective retry after an unparseable structured reply
pub fn json_retry_prompt(original_prompt: &str, bad_reply: &str, shape: &str) -> String {
    format!(
        "{JSON_RETRY_PREFIX} Return only valid JSON of the form {shape}, \
         with no prose and no code fences.\n\n\
         Previous reply:\n{bad_reply}\n\n\
         Original request:\n{original_prompt}"
    )
}

pub fn tone_prompt(url: &str, ux_issues_json: &str, text_sample: &str, language: Language) -> String {
    let sample = if text_sample.trim().is_empty() {
        "No text extracted."
    } else {
        text_sample
    };

    format!(
        "Based on the following user experience issues and text sample from {url}, assess the content's \
         originality, tone (for example formal, informal, engaging or dry) and readability.\n\
         Suggest improvements to content quality and overall user experience.\n\n\
         UX issues:\n{ux_issues_json}\n\n\
         Text sample:\n{sample}\n\n{}",
        respond_in(language)
    )
}

pub fn adsense_prompt(url: &str, context_json: &str, language: Language) -> String {
    format!(
        "Assess the AdSense readiness of {url} using the analysis data below.\n\
         Consider content quality and originality, whether there is enough text, user experience, \
         navigation and compliance with AdSense program policies.\n\
         Give an overall assessment and 3 to 5 specific areas to improve for approval.\n\
         Reply with JSON only, exactly of the form {ADSENSE_SHAPE}.\n\n\
         Analysis data:\n{context_json}\n\n{}",
        respond_in(language)
    )
}

pub fn broken_links_prompt(url: &str, broken_links: &[String], language: Language) -> String {
    let links = broken_links
        .iter()
        .map(|link| format!("- {}", link))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Given the following broken links found on {url}, suggest practical fixes that improve SEO \
         and user experience, such as checking redirects, updating URLs or removing links.\n\
         Format the reply as a numbered list with one suggestion per line.\n\n\
         Broken links:\n{links}\n\n{}",
        respond_in(language)
    )
}

pub fn seo_rewrite_prompt(
    url: &str,
    title: Option<&str>,
    meta_description: Option<&str>,
    keywords: &[String],
    language: Language,
) -> String {
    let keywords = if keywords.is_empty() {
        "none found".to_string()
    } else {
        keywords.join(", ")
    };

    format!(
        "Rewrite the SEO title and meta description of {url}.\n\
         Current title: \"{}\"\n\
         Current meta description: \"{}\"\n\
         Relevant keywords: {keywords}\n\
         Write 3 titles under {MAX_TITLE_CHARS} characters and 3 meta descriptions under \
         {MAX_META_DESCRIPTION_CHARS} characters, optimized for click-through rate and search visibility.\n\
         Reply with JSON only, exactly of the form {REWRITES_SHAPE}.\n\n{}",
        title.unwrap_or("(missing)"),
        meta_description.unwrap_or("(missing)"),
        respond_in(language)
    )
}

pub fn refine_prompt(text_sample: &str, language: Language) -> String {
    format!(
        "Refine the following text sample to improve its readability, engagement and SEO.\n\
         Give the refined text and 3 to 5 specific suggestions for further improvement.\n\
         Reply with JSON only, exactly of the form {REFINEMENT_SHAPE}.\n\n\
         Text sample:\n{text_sample}\n\n{}",
        respond_in(language)
    )
}

/// One question asked about a submitted article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleAspect {
    Structure,
    Keywords,
    Health,
    Originality,
}

impl ArticleAspect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Structure => "suggested_structure",
            Self::Keywords => "keyword_suggestions",
            Self::Health => "content_health",
            Self::Originality => "originality",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Self::Structure => {
                "Analyze the following article and suggest an SEO-friendly structure: headings, \
                 subheadings and key sections. Reply with clear, structured text."
            }
            Self::Keywords => {
                "Based on the following article, suggest relevant SEO keywords and long-tail keywords. \
                 Reply with a single comma-separated list of keywords and nothing else."
            }
            Self::Health => {
                "Assess the SEO health of the following article. Cover readability, keyword stuffing \
                 and overall SEO quality."
            }
            Self::Originality => {
                "Assess the originality of the following article. Point out anything that reads as \
                 copied or lacks a unique perspective."
            }
        }
    }
}

pub fn article_prompt(aspect: ArticleAspect, article: &str, language: Language) -> String {
    format!(
        "{}\n\nArticle:\n{article}\n\n{}",
        aspect.instruction(),
        respond_in(language)
    )
}

fn respond_in(language: Language) -> String {
    format!("Respond in {}.", language.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_instruction() {
        assert!(summary_prompt("https://a.com", "{}", Language::En).ends_with("Respond in English."));
        assert!(summary_prompt("https://a.com", "{}", Language::Ar).ends_with("Respond in Arabic."));
    }

    #[test]
    fn test_seo_prompt_requests_json() {
        let prompt = seo_suggestions_prompt("https://a.com", "{}", Language::En);
        assert!(prompt.contains(r#"{"suggestions": ["...", "..."]}"#));
    }

    #[test]
    fn test_retry_prompt_is_distinct() {
        let original = seo_suggestions_prompt("https://a.com", "{}", Language::En);
        let retry = json_retry_prompt(&original, "Sure! Here are some ideas", SUGGESTIONS_SHAPE);
        assert!(retry.starts_with(JSON_RETRY_PREFIX));
        assert!(retry.contains(SUGGESTIONS_SHAPE));
        assert!(!original.starts_with(JSON_RETRY_PREFIX));
    }

    #[test]
    fn test_tone_prompt_without_text() {
        let prompt = tone_prompt("https://a.com", "[]", "   ", Language::En);
        assert!(prompt.contains("No text extracted."));
    }

    #[test]
    fn test_rewrite_prompt_marks_missing_fields() {
        let prompt = seo_rewrite_prompt("https://a.com", Some("Home"), None, &[], Language::Ar);
        assert!(prompt.contains("Current title: \"Home\""));
        assert!(prompt.contains("Current meta description: \"(missing)\""));
        assert!(prompt.contains("Relevant keywords: none found"));
        assert!(prompt.ends_with("Respond in Arabic."));
    }

    #[test]
    fn test_broken_links_prompt_lists_each_link() {
        let links = vec!["https://a.com/gone".to_string(), "https://b.com/".to_string()];
        let prompt = broken_links_prompt("https://a.com", &links, Language::En);
        assert!(prompt.contains("- https://a.com/gone\n- https://b.com/"));
    }

    #[test]
    fn test_article_prompts_differ_by_aspect() {
        let structure = article_prompt(ArticleAspect::Structure, "Body", Language::En);
        let keywords = article_prompt(ArticleAspect::Keywords, "Body", Language::En);
        assert_ne!(structure, keywords);
        assert!(keywords.contains("comma-separated"));
        assert!(structure.contains("Article:\nBody"));
    }
}
