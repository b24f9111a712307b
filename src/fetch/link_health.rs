//! Link health probes
//!
//! One probe per URL: a HEAD request, falling back to GET when the server
//! rejects the method. This is the unit the SEO analyzer fans out over.

use crate::fetch::fetcher::classify_error;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, Serializer};
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Outcome of probing a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkHealth {
    /// Final status below 400
    Healthy(u16),
    /// Status 400 or above
    BrokenStatus(u16),
    /// Network-level failure
    BrokenError(String),
}

impl LinkHealth {
    pub fn is_broken(&self) -> bool {
        !matches!(self, Self::Healthy(_))
    }
}

/// What was recorded for a link, serialized as a status code or a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Status(u16),
    Error(String),
    /// Over the per-page probe cap; never counted as broken
    Skipped,
}

impl From<LinkHealth> for ProbeOutcome {
    fn from(health: LinkHealth) -> Self {
        match health {
            LinkHealth::Healthy(status) | LinkHealth::BrokenStatus(status) => Self::Status(status),
            LinkHealth::BrokenError(error) => Self::Error(error),
        }
    }
}

impl Serialize for ProbeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Status(status) => serializer.serialize_u16(*status),
            Self::Error(error) => serializer.serialize_str(error),
            Self::Skipped => serializer.serialize_str("skipped"),
        }
    }
}

/// Probes link reachability with a per-probe timeout
#[derive(Debug, Clone)]
pub struct LinkHealthChecker {
    client: Client,
    timeout: Duration,
}

impl LinkHealthChecker {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Checks a single URL
    ///
    /// Sends HEAD first. A 405 or 501 answer means the server does not
    /// support HEAD for this resource, so the probe is repeated with GET.
    pub async fn check(&self, url: &Url) -> LinkHealth {
        let health = match self.probe(Method::HEAD, url).await {
            LinkHealth::BrokenStatus(status)
                if status == StatusCode::METHOD_NOT_ALLOWED.as_u16()
                    || status == StatusCode::NOT_IMPLEMENTED.as_u16() =>
            {
                self.probe(Method::GET, url).await
            }
            other => other,
        };

        trace!("Link {} -> {:?}", url, health);
        health
    }

    async fn probe(&self, method: Method, url: &Url) -> LinkHealth {
        match self
            .client
            .request(method, url.clone())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status().as_u16();
                if status >= 400 {
                    LinkHealth::BrokenStatus(status)
                } else {
                    LinkHealth::Healthy(status)
                }
            }
            Err(e) => LinkHealth::BrokenError(classify_error(&e).to_string()),
        }
    }
}
