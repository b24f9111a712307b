//! Domain trust analyzer
//!
//! Four independent sub-checks on the target's host. Each runs under its own
//! timeout and degrades to "unknown" instead of failing the analyzer.

mod dns;
mod rdap;
mod tls;

pub use dns::{DnsHealth, DnsProbe};
pub use rdap::{age_in_years, RdapClient, RdapError};
pub use tls::{SslStatus, TlsProbe};

use crate::config::DomainConfig;
use chrono::Utc;
use reqwest::Client;
use serde::{Serialize, Serializer};
use std::time::Duration;
use tracing::{debug, info};

/// Registration age in whole years, or `"unknown"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgeYears {
    Known(u32),
    #[default]
    Unknown,
}

impl Serialize for AgeYears {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(years) => serializer.serialize_u32(*years),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Reputation status; no reputation service is wired in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlacklistStatus {
    #[default]
    Unknown,
}

/// Output of the domain trust analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainTrustResult {
    pub domain: String,
    pub age_years: AgeYears,
    pub ssl_status: SslStatus,
    pub dns_health: DnsHealth,
    pub blacklist_status: BlacklistStatus,
}

impl DomainTrustResult {
    /// Every sub-check unknown for the same reason
    pub fn unknown(domain: impl Into<String>, reason: &str) -> Self {
        Self {
            domain: domain.into(),
            age_years: AgeYears::Unknown,
            ssl_status: SslStatus::unknown(reason),
            dns_health: DnsHealth::unknown(reason),
            blacklist_status: BlacklistStatus::Unknown,
        }
    }

    /// True when no sub-check produced data
    pub fn is_all_unknown(&self) -> bool {
        self.age_years == AgeYears::Unknown
            && matches!(self.ssl_status, SslStatus::Unknown { .. })
            && matches!(self.dns_health, DnsHealth::Unknown { .. })
    }
}

/// Runs registration, TLS, DNS and blacklist checks concurrently
#[derive(Debug, Clone)]
pub struct DomainTrustAnalyzer {
    rdap: RdapClient,
    tls: TlsProbe,
    dns: DnsProbe,
    probe_timeout: Duration,
}

impl DomainTrustAnalyzer {
    pub fn new(client: Client, config: &DomainConfig) -> Self {
        let probe_timeout = Duration::from_secs(config.probe_timeout_secs);
        Self {
            rdap: RdapClient::new(client, &config.rdap_base_url, probe_timeout),
            tls: TlsProbe::new(probe_timeout),
            dns: DnsProbe::new(probe_timeout),
            probe_timeout,
        }
    }

    /// Replaces the TLS probe, e.g. to target a non-standard port
    pub fn with_tls_probe(mut self, tls: TlsProbe) -> Self {
        self.tls = tls;
        self
    }

    pub async fn analyze(&self, domain: &str) -> DomainTrustResult {
        let timeout = self.probe_timeout;

        let (age, ssl, dns) = tokio::join!(
            tokio::time::timeout(timeout, self.registration_age(domain)),
            tokio::time::timeout(timeout, self.tls.check(domain)),
            tokio::time::timeout(timeout, self.dns.check(domain)),
        );

        let result = DomainTrustResult {
            domain: domain.to_string(),
            age_years: age.unwrap_or(AgeYears::Unknown),
            ssl_status: ssl.unwrap_or_else(|_| SslStatus::unknown("timed out")),
            dns_health: dns.unwrap_or_else(|_| DnsHealth::unknown("timed out")),
            blacklist_status: BlacklistStatus::Unknown,
        };

        info!(
            "Domain trust for {}: age {:?}, tls valid: {}",
            domain,
            result.age_years,
            result.ssl_status.is_valid()
        );
        result
    }

    async fn registration_age(&self, domain: &str) -> AgeYears {
        match self.rdap.registration_date(domain).await {
            Ok(registered) => AgeYears::Known(age_in_years(registered, Utc::now())),
            Err(e) => {
                debug!("Registration lookup for {} failed: {}", domain, e);
                AgeYears::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_age_serialization() {
        assert_eq!(serde_json::to_value(AgeYears::Known(29)).unwrap(), json!(29));
        assert_eq!(serde_json::to_value(AgeYears::Unknown).unwrap(), json!("unknown"));
        assert_eq!(serde_json::to_value(BlacklistStatus::Unknown).unwrap(), json!("unknown"));
    }

    #[test]
    fn test_unknown_form_is_fully_keyed() {
        let json = serde_json::to_value(DomainTrustResult::unknown("example.com", "skipped")).unwrap();
        for key in ["domain", "age_years", "ssl_status", "dns_health", "blacklist_status"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[tokio::test]
    async fn test_analyze_local_host() {
        let server = MockServer::start().await;
        let registered = (Utc::now() - chrono::Duration::days(365 * 3 + 10)).to_rfc3339();
        Mock::given(method("GET"))
            .and(path("/domain/127.0.0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "events": [{"eventAction": "registration", "eventDate": registered}]
            })))
            .mount(&server)
            .await;

        let config = DomainConfig {
            probe_timeout_secs: 2,
            rdap_base_url: server.uri(),
        };
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let closed_port = listener.local_addr().unwrap().port();
        drop(listener);

        let analyzer = DomainTrustAnalyzer::new(Client::new(), &config)
            .with_tls_probe(TlsProbe::new(Duration::from_secs(2)).with_port(closed_port));
        let result = analyzer.analyze("127.0.0.1").await;

        assert_eq!(result.age_years, AgeYears::Known(3));
        assert!(matches!(result.ssl_status, SslStatus::Unknown { .. }));
        assert!(matches!(result.dns_health, DnsHealth::Healthy { .. }));
        assert_eq!(result.blacklist_status, BlacklistStatus::Unknown);
        assert!(!result.is_all_unknown());
    }
}
