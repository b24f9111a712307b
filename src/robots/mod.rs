//! Site file probe
//!
//! Checks for `/robots.txt` and a sitemap on the target's origin. Used by the
//! SEO analyzer's extended checks.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// What the probe found on the site's origin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SiteFiles {
    pub robots_txt_present: bool,

    /// Whether robots.txt allows generic agents to fetch the analyzed page
    pub target_allowed: Option<bool>,

    pub sitemap_present: bool,

    /// Sitemap location that was checked
    pub sitemap_url: Option<String>,
}

/// Fetches robots.txt and the sitemap it points to
#[derive(Debug, Clone)]
pub struct SiteFileProbe {
    client: Client,
    timeout: Duration,
}

impl SiteFileProbe {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Probes the origin of `page_url`
    ///
    /// The sitemap checked is the first `Sitemap:` directive in robots.txt,
    /// or `/sitemap.xml` on the origin when there is none. Failures count as
    /// absent.
    pub async fn probe(&self, page_url: &Url) -> SiteFiles {
        let mut files = SiteFiles::default();

        let robots = match page_url.join("/robots.txt") {
            Ok(robots_url) => self.get_text(&robots_url).await,
            Err(_) => None,
        };

        let mut sitemap_candidate = None;
        if let Some(content) = robots {
            let parsed = ParsedRobots::from_content(&content);
            files.robots_txt_present = true;
            files.target_allowed = Some(parsed.is_allowed(page_url.as_str(), "*"));
            sitemap_candidate = parsed
                .sitemaps()
                .into_iter()
                .find_map(|s| page_url.join(&s).ok());
        }

        let sitemap_url = sitemap_candidate.or_else(|| page_url.join("/sitemap.xml").ok());
        if let Some(sitemap_url) = sitemap_url {
            files.sitemap_present = self.get_text(&sitemap_url).await.is_some();
            files.sitemap_url = Some(sitemap_url.to_string());
        }

        debug!("Site files for {}: {:?}", page_url, files);
        files
    }

    async fn get_text(&self, url: &Url) -> Option<String> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        response.text().await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe() -> SiteFileProbe {
        SiteFileProbe::new(Client::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_robots_and_default_sitemap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
            .mount(&server)
            .await;

        let page = Url::parse(&format!("{}/blog/post", server.uri())).unwrap();
        let files = probe().probe(&page).await;

        assert!(files.robots_txt_present);
        assert_eq!(files.target_allowed, Some(true));
        assert!(files.sitemap_present);
        assert_eq!(files.sitemap_url, Some(format!("{}/sitemap.xml", server.uri())));
    }

    #[tokio::test]
    async fn test_sitemap_directive_is_followed() {
        let server = MockServer::start().await;
        let robots = format!("User-agent: *\nDisallow: /\nSitemap: {}/maps/index.xml", server.uri());
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(robots))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maps/index.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<sitemapindex/>"))
            .mount(&server)
            .await;

        let page = Url::parse(&server.uri()).unwrap();
        let files = probe().probe(&page).await;

        assert_eq!(files.target_allowed, Some(false));
        assert!(files.sitemap_present);
    }

    #[tokio::test]
    async fn test_nothing_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let page = Url::parse(&server.uri()).unwrap();
        let files = probe().probe(&page).await;

        assert!(!files.robots_txt_present);
        assert_eq!(files.target_allowed, None);
        assert!(!files.sitemap_present);
    }
}
