//! DNS resolvability probe

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// DNS state of the domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DnsHealth {
    Healthy { addresses: Vec<String> },
    /// The name has no A/AAAA records
    Unresolvable,
    Unknown { reason: String },
}

impl DnsHealth {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }
}

/// A-record lookup
#[derive(Clone)]
pub struct DnsProbe {
    resolver: Arc<TokioAsyncResolver>,
}

impl std::fmt::Debug for DnsProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsProbe").finish_non_exhaustive()
    }
}

impl DnsProbe {
    pub fn new(timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 2;
        opts.ndots = 0;

        Self {
            resolver: Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts)),
        }
    }

    pub async fn check(&self, domain: &str) -> DnsHealth {
        match self.resolver.lookup_ip(domain).await {
            Ok(lookup) => {
                let addresses: Vec<String> = lookup.iter().map(|ip| ip.to_string()).collect();
                if addresses.is_empty() {
                    DnsHealth::Unresolvable
                } else {
                    DnsHealth::Healthy { addresses }
                }
            }
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => DnsHealth::Unresolvable,
                _ => DnsHealth::unknown(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ip_literal_resolves_locally() {
        let probe = DnsProbe::new(Duration::from_secs(2));
        let health = probe.check("127.0.0.1").await;
        assert_eq!(
            health,
            DnsHealth::Healthy {
                addresses: vec!["127.0.0.1".to_string()]
            }
        );
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(DnsHealth::Unresolvable).unwrap();
        assert_eq!(json, serde_json::json!({"status": "unresolvable"}));
    }
}
