//! Robots.txt parser
//!
//! Thin wrapper over the `robotstxt` crate's matcher, plus extraction of the
//! `Sitemap:` directives it does not expose.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL to check
    /// * `user_agent` - Product token of the agent (e.g. `*` or `sitelens`)
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Returns every `Sitemap:` URL in file order
    ///
    /// The directive is group-independent, so it is collected wherever it
    /// appears.
    pub fn sitemaps(&self) -> Vec<String> {
        self.content
            .lines()
            .filter_map(|line| {
                let line = line.split('#').next().unwrap_or("").trim();
                let (key, value) = line.split_once(':')?;
                if key.trim().eq_ignore_ascii_case("sitemap") {
                    let value = value.trim();
                    (!value.is_empty()).then(|| value.to_string())
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allows_everything() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_allowed("https://example.com/admin", "*"));
    }

    #[test]
    fn test_disallow_specific() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin");
        assert!(robots.is_allowed("https://example.com/", "*"));
        assert!(!robots.is_allowed("https://example.com/admin/users", "*"));
    }

    #[test]
    fn test_specific_agent_group() {
        let robots =
            ParsedRobots::from_content("User-agent: sitelens\nDisallow: /\n\nUser-agent: *\nAllow: /");
        assert!(!robots.is_allowed("https://example.com/page", "sitelens"));
        assert!(robots.is_allowed("https://example.com/page", "OtherBot"));
    }

    #[test]
    fn test_sitemaps() {
        let robots = ParsedRobots::from_content(
            "User-agent: *\nDisallow:\nSitemap: https://example.com/sitemap_index.xml\n\
             sitemap: https://example.com/news.xml # news\nSitemap:\n",
        );
        assert_eq!(
            robots.sitemaps(),
            vec![
                "https://example.com/sitemap_index.xml".to_string(),
                "https://example.com/news.xml".to_string()
            ]
        );
    }

    #[test]
    fn test_no_sitemaps() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /tmp");
        assert!(robots.sitemaps().is_empty());
    }
}
