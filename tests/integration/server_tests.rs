//! HTTP surface tests against a live listener

use crate::helpers::{mount_link, mount_page, orchestrator, test_config, EXAMPLE_DOMAIN};
use serde_json::{json, Value};
use sitelens::output::MarkdownRenderer;
use sitelens::server::{serve, AppState};
use sitelens::storage::MemoryResultStore;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// Starts the service on an ephemeral port and returns its base URL
async fn start_service(site: &MockServer) -> String {
    let config = test_config(site);
    let state = AppState::new(
        orchestrator(&config),
        Arc::new(MemoryResultStore::new(Duration::from_secs(60), 16)),
        Arc::new(MarkdownRenderer),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_analyze_returns_result() {
    let site = MockServer::start().await;
    mount_page(&site, "/", EXAMPLE_DOMAIN).await;
    mount_link(&site, "/more", 200).await;
    let service = start_service(&site).await;

    let response = reqwest::Client::new()
        .post(format!("{}/analyze", service))
        .header("accept-language", "ar-SA,ar;q=0.9")
        .json(&json!({ "url": format!("{}/", site.uri()) }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["language"], "ar");
    // English filler is not in the Arabic stop-word set, so the page clears
    // the density minimum and earns the keyword points.
    assert_eq!(body["seo"]["score"], 70);
    assert!(body["seo"]["keyword_density"]["domain"].is_number());
    assert_eq!(body["page_speed"]["category_scores"]["performance"], "N/A");
    assert!(body["analysis_id"].is_string());
    assert!(body["seo"]["meta_description"].is_null());
}

#[tokio::test]
async fn test_analyze_rejects_invalid_url() {
    let site = MockServer::start().await;
    let service = start_service(&site).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/analyze", service))
        .json(&json!({ "url": "not a url" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("parse"));

    let response = client
        .post(format!("{}/analyze", service))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/analyze", service))
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn test_report_without_prior_analysis() {
    let site = MockServer::start().await;
    let service = start_service(&site).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate_report", service))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("/analyze"));
}

#[tokio::test]
async fn test_report_requires_naming_the_analysis() {
    let site = MockServer::start().await;
    mount_page(&site, "/private", EXAMPLE_DOMAIN).await;
    mount_link(&site, "/more", 200).await;
    let service = start_service(&site).await;
    let client = reqwest::Client::new();

    let analyzed = client
        .post(format!("{}/analyze", service))
        .json(&json!({ "url": format!("{}/private", site.uri()) }))
        .send()
        .await
        .unwrap();
    assert_eq!(analyzed.status().as_u16(), 200);

    // A different caller with no id and no URL gets nothing back
    for body in ["", "{}"] {
        let response = client
            .post(format!("{}/generate_report", service))
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);

        let text = response.text().await.unwrap();
        assert!(!text.contains("/private"));
        let error: Value = serde_json::from_str(&text).unwrap();
        assert!(error["error"]
            .as_str()
            .unwrap()
            .starts_with("Missing prior analysis"));
    }
}

#[tokio::test]
async fn test_report_for_stored_analysis() {
    let site = MockServer::start().await;
    mount_page(&site, "/", EXAMPLE_DOMAIN).await;
    mount_link(&site, "/more", 200).await;
    let service = start_service(&site).await;
    let client = reqwest::Client::new();
    let target = format!("{}/", site.uri());

    let analysis: Value = client
        .post(format!("{}/analyze", service))
        .json(&json!({ "url": target }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = analysis["analysis_id"].as_str().unwrap().to_string();

    let response = client
        .post(format!("{}/generate_report", service))
        .json(&json!({ "analysis_id": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let headers = response.headers();
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/markdown"));
    let disposition = headers["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains(&id));

    let report = response.text().await.unwrap();
    assert!(report.contains("Example Domain"));

    // Lookup by URL finds the same analysis
    let by_url = client
        .post(format!("{}/generate_report", service))
        .json(&json!({ "url": target }))
        .send()
        .await
        .unwrap();
    assert_eq!(by_url.status().as_u16(), 200);

    // Unknown ids are a client error
    let unknown = client
        .post(format!("{}/generate_report", service))
        .json(&json!({ "analysis_id": "00000000-0000-0000-0000-000000000000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 400);
}

#[tokio::test]
async fn test_article_analyze_rejects_blank_text() {
    let site = MockServer::start().await;
    let service = start_service(&site).await;
    let client = reqwest::Client::new();

    for body in [json!({}), json!({ "article_text": "  \n " })] {
        let response = client
            .post(format!("{}/article_analyze", service))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("article_text"));
    }
}

#[tokio::test]
async fn test_article_analyze_without_generative_service() {
    let site = MockServer::start().await;
    let service = start_service(&site).await;

    let response = reqwest::Client::new()
        .post(format!("{}/article_analyze", service))
        .json(&json!({ "article_text": "A short article about page speed." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    for field in [
        "suggested_structure",
        "keyword_suggestions",
        "content_health",
        "originality",
    ] {
        assert!(
            body[field].as_str().unwrap().starts_with("unavailable: "),
            "{} should be unavailable",
            field
        );
    }
    assert!(body["error"].is_string());
}
