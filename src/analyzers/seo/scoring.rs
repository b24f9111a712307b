//! SEO score
//!
//! A deterministic weighted checklist. Every unmet criterion adds one
//! human-readable tip; tips are deduplicated and kept in check order.

pub const TITLE_POINTS: u32 = 15;
pub const META_POINTS: u32 = 15;
pub const H1_POINTS: u32 = 10;
pub const LINK_POINTS_CLEAN: u32 = 20;
pub const LINK_POINTS_FEW: u32 = 10;
pub const ALT_POINTS_CLEAN: u32 = 15;
pub const ALT_POINTS_FEW: u32 = 7;
pub const KEYWORD_POINTS: u32 = 10;
pub const EXTENDED_POINTS: u32 = 5;

/// Minimum word count for the extended content-length check
pub const MIN_CONTENT_WORDS: usize = 300;

const TITLE_LEN: std::ops::RangeInclusive<usize> = 10..=70;
const META_LEN: std::ops::RangeInclusive<usize> = 50..=160;

/// Counts at or below this earn the partial tier
const FEW_ISSUES: usize = 4;

/// Everything the checklist looks at
#[derive(Debug, Clone, Default)]
pub struct ScoreInputs<'a> {
    pub title: Option<&'a str>,
    pub meta_description: Option<&'a str>,
    pub h1_count: usize,
    pub broken_links: usize,
    pub alt_issues: usize,
    pub has_keywords: bool,
    /// Present only when extended checks ran
    pub extended: Option<ExtendedInputs>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendedInputs {
    pub word_count: usize,
    pub robots_txt_present: bool,
    pub sitemap_present: bool,
}

/// Score in `0..=100` and the tips explaining lost points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoScore {
    pub score: u8,
    pub tips: Vec<String>,
}

#[derive(Default)]
struct Tips(Vec<String>);

impl Tips {
    fn add(&mut self, tip: impl Into<String>) {
        let tip = tip.into();
        if !self.0.contains(&tip) {
            self.0.push(tip);
        }
    }
}

/// Scores a page
///
/// # Example
///
/// ```
/// use sitelens::analyzers::seo::{compute_score, ScoreInputs};
///
/// let result = compute_score(&ScoreInputs {
///     title: Some("Example Domain"),
///     h1_count: 1,
///     ..Default::default()
/// });
/// assert_eq!(result.score, 60);
/// assert!(result.tips.contains(&"Add a meta description.".to_string()));
/// ```
pub fn compute_score(inputs: &ScoreInputs<'_>) -> SeoScore {
    let mut points: u32 = 0;
    let mut tips = Tips::default();

    match inputs.title.map(|t| t.chars().count()) {
        Some(len) if TITLE_LEN.contains(&len) => points += TITLE_POINTS,
        Some(_) => tips.add("Adjust the title length to 10-70 characters."),
        None => tips.add("Add a title tag."),
    }

    match inputs.meta_description.map(|m| m.chars().count()) {
        Some(len) if META_LEN.contains(&len) => points += META_POINTS,
        Some(_) => tips.add("Adjust the meta description length to 50-160 characters."),
        None => tips.add("Add a meta description."),
    }

    match inputs.h1_count {
        1 => points += H1_POINTS,
        0 => tips.add("Add an H1 heading."),
        _ => tips.add("Use exactly one H1 heading."),
    }

    match inputs.broken_links {
        0 => points += LINK_POINTS_CLEAN,
        n => {
            if n <= FEW_ISSUES {
                points += LINK_POINTS_FEW;
            }
            tips.add(format!("Fix {} broken link(s).", n));
        }
    }

    match inputs.alt_issues {
        0 => points += ALT_POINTS_CLEAN,
        n => {
            if n <= FEW_ISSUES {
                points += ALT_POINTS_FEW;
            }
            tips.add(format!("Add alt text to {} image(s).", n));
        }
    }

    if inputs.has_keywords {
        points += KEYWORD_POINTS;
    } else {
        tips.add("Add more focused, keyword-rich content.");
    }

    if let Some(extended) = inputs.extended {
        if extended.word_count >= MIN_CONTENT_WORDS {
            points += EXTENDED_POINTS;
        } else {
            tips.add("Expand the page content to at least 300 words.");
        }

        if extended.robots_txt_present {
            points += EXTENDED_POINTS;
        } else {
            tips.add("Add a robots.txt file.");
        }

        if extended.sitemap_present {
            points += EXTENDED_POINTS;
        } else {
            tips.add("Add a sitemap.xml file.");
        }
    }

    SeoScore {
        score: points.min(100) as u8,
        tips: tips.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_META: &str =
        "A thorough description of this page that is comfortably within the limits.";

    fn clean_page() -> ScoreInputs<'static> {
        ScoreInputs {
            title: Some("A well sized page title"),
            meta_description: Some(GOOD_META),
            h1_count: 1,
            broken_links: 0,
            alt_issues: 0,
            has_keywords: true,
            extended: None,
        }
    }

    #[test]
    fn test_perfect_base_score() {
        let result = compute_score(&clean_page());
        assert_eq!(result.score, 85);
        assert!(result.tips.is_empty());
    }

    #[test]
    fn test_example_domain_scenario() {
        let result = compute_score(&ScoreInputs {
            title: Some("Example Domain"),
            meta_description: None,
            h1_count: 1,
            broken_links: 0,
            alt_issues: 0,
            has_keywords: false,
            extended: None,
        });
        assert_eq!(result.score, 60);
        assert_eq!(
            result.tips,
            vec!["Add a meta description.", "Add more focused, keyword-rich content."]
        );
    }

    #[test]
    fn test_broken_links_and_missing_alts_lower_score() {
        let clean = compute_score(&clean_page());
        let degraded = compute_score(&ScoreInputs {
            broken_links: 6,
            alt_issues: 3,
            ..clean_page()
        });

        assert!(degraded.score < clean.score);
        assert_eq!(clean.score - degraded.score, 20 + 8);
        assert!(degraded.tips.contains(&"Fix 6 broken link(s).".to_string()));
        assert!(degraded.tips.contains(&"Add alt text to 3 image(s).".to_string()));
    }

    #[test]
    fn test_tier_boundaries() {
        let four = compute_score(&ScoreInputs {
            broken_links: 4,
            alt_issues: 4,
            ..clean_page()
        });
        let five = compute_score(&ScoreInputs {
            broken_links: 5,
            alt_issues: 5,
            ..clean_page()
        });
        assert_eq!(four.score, 85 - 10 - 8);
        assert_eq!(five.score, 85 - 20 - 15);
    }

    #[test]
    fn test_title_length_bounds() {
        let short = compute_score(&ScoreInputs {
            title: Some("Too short"),
            ..clean_page()
        });
        let exact = compute_score(&ScoreInputs {
            title: Some("Ten chars!"),
            ..clean_page()
        });
        let long_title = "x".repeat(71);
        let long = compute_score(&ScoreInputs {
            title: Some(&long_title),
            ..clean_page()
        });

        assert_eq!(short.score, 70);
        assert_eq!(exact.score, 85);
        assert_eq!(long.score, 70);
        assert_eq!(long.tips, vec!["Adjust the title length to 10-70 characters."]);
    }

    #[test]
    fn test_multiple_h1() {
        let result = compute_score(&ScoreInputs {
            h1_count: 2,
            ..clean_page()
        });
        assert_eq!(result.score, 75);
        assert_eq!(result.tips, vec!["Use exactly one H1 heading."]);
    }

    #[test]
    fn test_empty_page_scores_in_range() {
        let result = compute_score(&ScoreInputs::default());
        assert_eq!(result.score, 20 + 15);
        assert_eq!(result.tips.len(), 4);
    }

    #[test]
    fn test_extended_checks() {
        let all = compute_score(&ScoreInputs {
            extended: Some(ExtendedInputs {
                word_count: 300,
                robots_txt_present: true,
                sitemap_present: true,
            }),
            ..clean_page()
        });
        assert_eq!(all.score, 100);

        let none = compute_score(&ScoreInputs {
            extended: Some(ExtendedInputs::default()),
            ..clean_page()
        });
        assert_eq!(none.score, 85);
        assert_eq!(none.tips.len(), 3);
    }
}
