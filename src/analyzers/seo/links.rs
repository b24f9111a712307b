//! Bounded link-health fan-out

use crate::analyzers::seo::extract::DiscoveredLink;
use crate::fetch::{LinkHealthChecker, ProbeOutcome};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::debug;

/// Health record for one deduplicated link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub url: String,
    pub is_internal: bool,
    pub is_broken: bool,
    /// HTTP status, error message, or `"skipped"`
    pub status_or_error: ProbeOutcome,
}

/// Probes links with at most `max_concurrent` requests in flight
///
/// Only the first `max_checked` links are probed; the rest are recorded as
/// skipped and never count as broken. Output order matches input order.
pub async fn check_links(
    checker: &LinkHealthChecker,
    links: Vec<DiscoveredLink>,
    max_checked: usize,
    max_concurrent: usize,
) -> Vec<LinkRecord> {
    let split = links.len().min(max_checked);
    let mut links = links;
    let skipped = links.split_off(split);

    debug!(
        "Probing {} link(s), skipping {} over the cap",
        links.len(),
        skipped.len()
    );

    let mut records: Vec<LinkRecord> = stream::iter(links)
        .map(|link| async move {
            let health = checker.check(&link.url).await;
            LinkRecord {
                url: link.url.to_string(),
                is_internal: link.is_internal,
                is_broken: health.is_broken(),
                status_or_error: health.into(),
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    records.extend(skipped.into_iter().map(|link| LinkRecord {
        url: link.url.to_string(),
        is_internal: link.is_internal,
        is_broken: false,
        status_or_error: ProbeOutcome::Skipped,
    }));

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    fn link(server: &MockServer, p: &str) -> DiscoveredLink {
        DiscoveredLink {
            url: Url::parse(&format!("{}{}", server.uri(), p)).unwrap(),
            is_internal: true,
        }
    }

    fn checker() -> LinkHealthChecker {
        LinkHealthChecker::new(Client::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_records_in_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let links = vec![link(&server, "/ok"), link(&server, "/gone")];
        let records = check_links(&checker(), links, 150, 16).await;

        assert_eq!(records.len(), 2);
        assert!(records[0].url.ends_with("/ok"));
        assert!(!records[0].is_broken);
        assert_eq!(records[1].status_or_error, ProbeOutcome::Status(410));
        assert!(records[1].is_broken);
    }

    #[tokio::test]
    async fn test_links_over_cap_are_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let links = (0..5).map(|i| link(&server, &format!("/p{}", i))).collect();
        let records = check_links(&checker(), links, 2, 4).await;

        assert_eq!(records.len(), 5);
        assert_eq!(records.iter().filter(|r| r.is_broken).count(), 2);
        assert!(records[2..]
            .iter()
            .all(|r| r.status_or_error == ProbeOutcome::Skipped && !r.is_broken));
    }

    struct ConcurrencyGauge {
        current: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl Respond for ConcurrencyGauge {
        fn respond(&self, _request: &Request) -> ResponseTemplate {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(50));
            self.current.fetch_sub(1, Ordering::SeqCst);
            ResponseTemplate::new(200)
        }
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let server = MockServer::start().await;
        let peak = Arc::new(AtomicUsize::new(0));
        Mock::given(method("HEAD"))
            .respond_with(ConcurrencyGauge {
                current: Arc::new(AtomicUsize::new(0)),
                peak: peak.clone(),
            })
            .mount(&server)
            .await;

        let links = (0..12).map(|i| link(&server, &format!("/c{}", i))).collect();
        let records = check_links(&checker(), links, 150, 3).await;

        assert_eq!(records.len(), 12);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }
}
