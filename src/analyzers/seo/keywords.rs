//! Keyword density
//!
//! Tokens are lowercase word runs of at least three characters, excluding
//! numbers and the language's stop words. Density is a token's share of all
//! retained tokens, as a percentage rounded to two decimals.

use crate::orchestrator::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// Densities at or below this percentage are not reported
pub const DENSITY_THRESHOLD: f64 = 0.5;

/// Maximum number of keywords reported
pub const TOP_KEYWORDS: usize = 10;

/// Pages with fewer retained tokens get no density map
pub const MIN_TOKENS_FOR_DENSITY: usize = 20;

const MIN_TOKEN_CHARS: usize = 3;

static WORD_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\w+").ok());

static STOP_WORDS_EN: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "is", "are", "was", "were", "and", "or", "but", "if", "then", "else",
        "when", "where", "how", "what", "why", "who", "which", "this", "that", "these", "those",
        "of", "to", "in", "on", "at", "with", "from", "by", "for", "as", "it", "he", "she", "we",
        "you", "they", "them", "us", "him", "her", "its", "their", "my", "your", "our", "his",
        "me", "i", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
        "would", "can", "could", "should", "might", "must", "get", "go", "say", "see", "make",
        "know", "take", "come", "think", "look", "want", "give", "use", "find", "tell", "ask",
        "work", "seem", "feel", "try", "leave", "call", "good", "new", "first", "last", "long",
        "great", "little", "own", "other", "old", "right", "big", "high", "different", "small",
        "large", "next", "early", "young", "important", "few", "public", "bad", "same", "able",
        "not", "all", "any", "more", "most", "some", "such", "than", "too", "very", "just",
        "also", "into", "about", "over", "only", "there", "here", "out", "up",
    ]
    .into_iter()
    .collect()
});

static STOP_WORDS_AR: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "من", "في", "إلى", "على", "عن", "مع", "ثم", "أو", "إذا", "كان", "هو", "هي", "هم", "نحن",
        "أنت", "أنتم", "هذا", "هذه", "ذلك", "تلك", "الذي", "التي", "الذين", "اللاتي", "ما", "هل",
        "لا", "نعم", "كل", "بعض", "غير", "أكثر", "أقل", "أول", "آخر", "جديد", "قديم", "كبير",
        "صغير", "طويل", "قصير", "جيد", "سيء", "مختلف", "نفس", "أهم", "أفضل", "أسوأ", "أين", "كيف",
        "متى", "لماذا", "أي", "أية", "لأن", "لكن", "لكي", "حتى", "دون", "بين", "فوق", "تحت",
        "أمام", "خلف", "جانب", "داخل", "خارج", "عند", "قبل", "بعد", "حين", "ذات", "عدة", "فقط",
        "أيضا", "حقا", "جدا", "مثلا", "دائما", "أبدا", "غالبا", "نادرا", "أحيانا", "ربما",
        "بالتأكيد", "بالفعل", "فورا", "مباشرة", "عادة",
    ]
    .into_iter()
    .collect()
});

fn stop_words(language: Language) -> &'static HashSet<&'static str> {
    match language {
        Language::En => &STOP_WORDS_EN,
        Language::Ar => &STOP_WORDS_AR,
    }
}

/// Ordered keyword → density map, highest density first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordDensity(Vec<(String, f64)>);

impl KeywordDensity {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(word, density)| (word.as_str(), *density))
    }
}

// Serialized as a JSON object in rank order.
impl Serialize for KeywordDensity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, density) in &self.0 {
            map.serialize_entry(word, density)?;
        }
        map.end()
    }
}

/// Splits text into density tokens
pub fn tokenize(text: &str, language: Language) -> Vec<String> {
    let Some(word_re) = WORD_RE.as_ref() else {
        return Vec::new();
    };
    let stop = stop_words(language);

    word_re
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|word| !word.chars().all(|c| c.is_numeric()))
        .filter(|word| !stop.contains(word.as_str()))
        .collect()
}

/// Computes the top keywords and their densities
///
/// Returns an empty map when there are fewer than
/// [`MIN_TOKENS_FOR_DENSITY`] tokens. Otherwise every reported density is
/// strictly above [`DENSITY_THRESHOLD`] after rounding, and at most
/// [`TOP_KEYWORDS`] entries are returned, sorted by density descending then
/// word ascending.
pub fn keyword_density(tokens: &[String]) -> KeywordDensity {
    let total = tokens.len();
    if total < MIN_TOKENS_FOR_DENSITY {
        return KeywordDensity::default();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, f64)> = counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), round2(count as f64 / total as f64 * 100.0)))
        .filter(|(_, density)| *density > DENSITY_THRESHOLD)
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_KEYWORDS);

    KeywordDensity(ranked)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
