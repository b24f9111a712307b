use sitelens::config::Config;
use sitelens::{Capabilities, Orchestrator};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The classic placeholder page, with its external link pointed at `/more`
pub const EXAMPLE_DOMAIN: &str = r#"<!doctype html>
<html>
<head>
    <title>Example Domain</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
</head>
<body>
<div>
    <h1>Example Domain</h1>
    <p>This domain is for use in illustrative examples in documents. You may use this
    domain in literature without prior coordination or asking for permission.</p>
    <p><a href="/more">More information...</a></p>
</div>
</body>
</html>"#;

/// Configuration whose collaborators all point at the mock server
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.domain.rdap_base_url = server.uri();
    config.domain.probe_timeout_secs = 1;
    config.links.timeout_secs = 2;
    config.server.request_deadline_secs = 20;
    config
}

pub fn orchestrator(config: &Config) -> Orchestrator {
    Orchestrator::new(config, &Capabilities::none()).expect("Failed to build orchestrator")
}

/// Serves `body` at `page_path`
pub async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Answers any method on `link_path` with `status`
pub async fn mount_link(server: &MockServer, link_path: &str, status: u16) {
    Mock::given(path(link_path))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
