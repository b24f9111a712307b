use crate::url::parse_target_url;
use crate::InputError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Report language; selects stop words and the AI response language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Picks the language from the first range of an `Accept-Language` header
    ///
    /// Only the primary subtag is considered; anything unsupported is English.
    pub fn from_accept_language(header: Option<&str>) -> Self {
        let primary = header
            .and_then(|value| value.split(',').next())
            .and_then(|range| range.split(';').next())
            .and_then(|tag| tag.trim().split(['-', '_']).next())
            .map(str::to_ascii_lowercase);

        match primary.as_deref() {
            Some("ar") => Self::Ar,
            _ => Self::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// English name, used in prompts
    pub fn name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ar => "Arabic",
        }
    }
}

/// A validated analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub target_url: Url,
    pub language: Language,
}

impl AnalysisRequest {
    /// Validates the target URL; nothing runs for an invalid request
    pub fn new(target: &str, language: Language) -> Result<Self, InputError> {
        Ok(Self {
            target_url: parse_target_url(target)?,
            language,
        })
    }
}

/// Longest article accepted for analysis, in characters
pub const MAX_ARTICLE_CHARS: usize = 50_000;

/// A validated article analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRequest {
    pub text: String,
    pub language: Language,
}

impl ArticleRequest {
    /// Rejects blank and oversized articles; surrounding whitespace is trimmed
    pub fn new(text: &str, language: Language) -> Result<Self, InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::MissingField("article_text"));
        }
        if text.chars().count() > MAX_ARTICLE_CHARS {
            return Err(InputError::TooLong {
                field: "article_text",
                max: MAX_ARTICLE_CHARS,
            });
        }

        Ok(Self {
            text: text.to_string(),
            language,
        })
    }
}
