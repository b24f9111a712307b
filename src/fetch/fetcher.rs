//! Page fetcher
//!
//! This module retrieves the HTML for the analysis target, including:
//! - Building the shared HTTP client with the configured user agent
//! - Following redirects up to a fixed number of hops
//! - Capping the body size to bound memory
//! - Classifying transport failures

use crate::config::{FetchConfig, UserAgentConfig};
use chrono::{DateTime, Utc};
use reqwest::{redirect::Policy, Client};
use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Errors raised when the target page cannot be retrieved
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("HTTP status {0}")]
    HttpError(u16),

    #[error("TLS failure: {0}")]
    TlsError(String),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("network error: {0}")]
    Network(String),
}

/// A successfully fetched page, shared read-only with every analyzer
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: Url,

    /// Decoded body, possibly truncated at the size cap
    pub html_body: String,

    pub status_code: u16,

    pub fetched_at: DateTime<Utc>,

    /// True when the body exceeded the size cap
    pub truncated: bool,
}

/// Builds the HTTP client shared by every outbound call
///
/// The user agent is formatted as `Name/Version (+ContactURL)`. No overall
/// timeout is set on the client; each caller sets its own per request.
///
/// # Example
///
/// ```no_run
/// use sitelens::config::{FetchConfig, UserAgentConfig};
/// use sitelens::fetch::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .connect_timeout(Duration::from_secs(fetch.timeout_secs.min(10)))
        .redirect(Policy::limited(fetch.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves raw HTML under timeout, redirect and size limits
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            max_body_bytes: config.max_body_bytes,
        }
    }

    /// Fetches a page
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - 2xx response, body read up to the size cap
    /// * `Err(FetchError)` - Non-success status or transport failure
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!("Fetching {}", url);

        let mut response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::HttpError(status.as_u16()));
        }

        let mut body: Vec<u8> = Vec::new();
        let mut truncated = false;

        while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(&e))? {
            let remaining = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        if truncated {
            warn!(
                "Body of {} exceeded {} bytes and was truncated",
                final_url, self.max_body_bytes
            );
        }

        Ok(FetchedPage {
            final_url,
            html_body: String::from_utf8_lossy(&body).into_owned(),
            status_code: status.as_u16(),
            fetched_at: Utc::now(),
            truncated,
        })
    }
}

/// Maps a transport error onto the fetch taxonomy
pub fn classify_error(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_redirect() {
        FetchError::TooManyRedirects
    } else if is_tls_error(err) {
        FetchError::TlsError(root_cause(err))
    } else if err.is_connect() {
        FetchError::ConnectionRefused(root_cause(err))
    } else {
        FetchError::Network(root_cause(err))
    }
}

fn is_tls_error(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        let message = inner.to_string().to_lowercase();
        if message.contains("certificate") || message.contains("tls") || message.contains("handshake")
        {
            return true;
        }
        source = inner.source();
    }
    false
}

fn root_cause(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message = inner.to_string();
        source = inner.source();
    }
    message
}
