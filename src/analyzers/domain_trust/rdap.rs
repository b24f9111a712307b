//! Registration age via RDAP
//!
//! Queries `{base}/domain/{name}` and reads the `registration` event. A 404
//! for a subdomain is retried once against its last two labels.

use crate::url::parent_domain;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RdapError {
    #[error("domain not found in RDAP")]
    NotFound,

    #[error("RDAP returned status {0}")]
    Status(u16),

    #[error("RDAP request failed: {0}")]
    Request(String),

    #[error("RDAP response has no registration date")]
    NoRegistrationDate,
}

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    action: String,
    #[serde(rename = "eventDate")]
    date: Option<String>,
}

/// Minimal RDAP client for domain registration dates
#[derive(Debug, Clone)]
pub struct RdapClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RdapClient {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Looks up the registration date of a domain
    pub async fn registration_date(&self, domain: &str) -> Result<DateTime<Utc>, RdapError> {
        match self.lookup(domain).await {
            Err(RdapError::NotFound) => match parent_domain(domain) {
                Some(parent) => {
                    debug!("RDAP miss for {}, retrying with {}", domain, parent);
                    self.lookup(&parent).await
                }
                None => Err(RdapError::NotFound),
            },
            other => other,
        }
    }

    async fn lookup(&self, domain: &str) -> Result<DateTime<Utc>, RdapError> {
        let url = format!("{}/domain/{}", self.base_url, domain);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/rdap+json, application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RdapError::Request(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(RdapError::NotFound),
            status if !status.is_success() => return Err(RdapError::Status(status.as_u16())),
            _ => {}
        }

        let body: RdapDomain = response
            .json()
            .await
            .map_err(|e| RdapError::Request(e.to_string()))?;

        registration_from(&body)
    }
}

fn registration_from(body: &RdapDomain) -> Result<DateTime<Utc>, RdapError> {
    body.events
        .iter()
        .filter(|event| event.action.eq_ignore_ascii_case("registration"))
        .find_map(|event| event.date.as_deref())
        .and_then(|date| DateTime::parse_from_rfc3339(date).ok())
        .map(|date| date.with_timezone(&Utc))
        .ok_or(RdapError::NoRegistrationDate)
}

/// Whole years between registration and `now`
pub fn age_in_years(registered: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - registered).num_days().max(0);
    (days / 365) as u32
}
