//! End-to-end analysis through the orchestrator

use crate::helpers::{mount_link, mount_page, orchestrator, test_config, EXAMPLE_DOMAIN};
use sitelens::analyzers::domain_trust::AgeYears;
use sitelens::analyzers::Reading;
use sitelens::fetch::ProbeOutcome;
use sitelens::{AnalysisRequest, Language};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request_for(server: &MockServer, page_path: &str) -> AnalysisRequest {
    AnalysisRequest::new(&format!("{}{}", server.uri(), page_path), Language::En)
        .expect("Failed to build request")
}

#[tokio::test]
async fn test_example_domain_scores_sixty() {
    let server = MockServer::start().await;
    mount_page(&server, "/", EXAMPLE_DOMAIN).await;
    mount_link(&server, "/more", 200).await;

    let config = test_config(&server);
    let result = orchestrator(&config)
        .analyze(&request_for(&server, "/"))
        .await
        .unwrap();

    let seo = &result.seo;
    assert_eq!(seo.title.as_deref(), Some("Example Domain"));
    assert_eq!(seo.meta_description, None);
    assert_eq!(seo.headings.h1, vec!["Example Domain"]);
    assert_eq!(seo.broken_link_count, 0);
    assert_eq!(seo.image_alt_issues, 0);
    // Too few tokens for a density report
    assert!(seo.keyword_density.is_empty());
    assert_eq!(seo.score, 60);
    assert!(seo.tips.contains(&"Add a meta description.".to_string()));

    assert!(result.ux.viewport_present);
    assert!(!result.failures.fetch);
    assert!(!result.failures.seo);
}

#[tokio::test]
async fn test_duplicate_hrefs_checked_once() {
    let server = MockServer::start().await;
    let page = r#"<html><head><title>Duplicate links page</title></head><body>
        <h1>Links</h1>
        <a href="/a">One</a>
        <a href="/a#section">Two</a>
        <a href="/a/?utm_source=newsletter">Three</a>
        <a href="mailto:someone@example.com">Mail</a>
        <a href="javascript:void(0)">Script</a>
    </body></html>"#;
    mount_page(&server, "/", page).await;
    Mock::given(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let result = orchestrator(&config)
        .analyze(&request_for(&server, "/"))
        .await
        .unwrap();

    assert_eq!(result.seo.links.len(), 1);
    assert_eq!(result.seo.internal_link_count, 1);
    assert_eq!(result.seo.links[0].status_or_error, ProbeOutcome::Status(200));
    server.verify().await;
}

#[tokio::test]
async fn test_broken_links_and_missing_alt_lower_score() {
    let server = MockServer::start().await;

    let mut body = String::from(
        r#"<html><head><title>Example Domain</title></head><body><h1>Example Domain</h1>"#,
    );
    for i in 0..6 {
        body.push_str(&format!(r#"<a href="/broken-{}">Broken {}</a>"#, i, i));
        mount_link(&server, &format!("/broken-{}", i), 404).await;
    }
    for i in 0..3 {
        body.push_str(&format!(r#"<img src="/img-{}.png">"#, i));
    }
    body.push_str("</body></html>");
    mount_page(&server, "/", &body).await;

    let config = test_config(&server);
    let result = orchestrator(&config)
        .analyze(&request_for(&server, "/"))
        .await
        .unwrap();

    let seo = &result.seo;
    assert_eq!(seo.broken_link_count, 6);
    assert_eq!(seo.images.missing_alt, 3);
    assert_eq!(seo.image_alt_issues, 3);
    // title 15 + h1 10 + broken 0 + alt 7
    assert_eq!(seo.score, 32);
    assert!(seo.score < 60);
    assert!(seo.tips.contains(&"Fix 6 broken link(s).".to_string()));
    assert!(seo.tips.contains(&"Add alt text to 3 image(s).".to_string()));
}

#[tokio::test]
async fn test_link_cap_marks_rest_skipped() {
    let server = MockServer::start().await;

    let mut body = String::from("<html><body>");
    for i in 0..5 {
        body.push_str(&format!(r#"<a href="/page-{}">Page</a>"#, i));
        mount_link(&server, &format!("/page-{}", i), 500).await;
    }
    body.push_str("</body></html>");
    mount_page(&server, "/", &body).await;

    let mut config = test_config(&server);
    config.links.max_links_checked = 2;

    let result = orchestrator(&config)
        .analyze(&request_for(&server, "/"))
        .await
        .unwrap();

    let skipped = result
        .seo
        .links
        .iter()
        .filter(|link| link.status_or_error == ProbeOutcome::Skipped)
        .count();
    assert_eq!(result.seo.links.len(), 5);
    assert_eq!(skipped, 3);
    assert_eq!(result.seo.broken_link_count, 2);
}

#[tokio::test]
async fn test_page_speed_without_key_is_not_available() {
    let server = MockServer::start().await;
    mount_page(&server, "/", EXAMPLE_DOMAIN).await;
    mount_link(&server, "/more", 200).await;

    let config = test_config(&server);
    let result = orchestrator(&config)
        .analyze(&request_for(&server, "/"))
        .await
        .unwrap();

    let scores = &result.page_speed.category_scores;
    assert_eq!(scores.performance, Reading::NotAvailable);
    assert_eq!(scores.seo, Reading::NotAvailable);
    assert!(result.page_speed.error.is_some());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["page_speed"]["core_web_vitals"]["speed_index"], "N/A");
    assert_eq!(json["page_speed"]["issues"], "N/A");
    assert!(json["ai_insight"]["summary"]
        .as_str()
        .unwrap()
        .starts_with("unavailable: "));
}

#[tokio::test]
async fn test_unreachable_page_still_reports_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let result = orchestrator(&config)
        .analyze(&request_for(&server, "/down"))
        .await
        .unwrap();

    assert!(result.failures.fetch);
    assert_eq!(result.fetch_error.as_deref(), Some("HTTP status 503"));
    assert!(result.seo.error.is_some());
    assert!(result.ux.error.is_some());
    assert_eq!(result.domain_trust.domain, "127.0.0.1");
    assert_eq!(result.domain_trust.age_years, AgeYears::Unknown);

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["final_url"].is_null());
    assert_eq!(json["domain_trust"]["blacklist_status"], "unknown");
}
