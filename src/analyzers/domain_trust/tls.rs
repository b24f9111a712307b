//! TLS certificate probe
//!
//! Performs a real handshake against port 443 with the webpki root store and
//! reads the leaf certificate's expiry.

use chrono::Utc;
use rustls::pki_types::ServerName;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::debug;

/// TLS state of the domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SslStatus {
    /// Handshake verified against the webpki roots
    Valid { expires_in_days: i64 },
    /// Server reachable but the certificate was rejected
    Invalid { reason: String },
    /// Could not be determined (no listener, timeout)
    Unknown { reason: String },
}

impl SslStatus {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Handshake-based certificate checker
#[derive(Clone)]
pub struct TlsProbe {
    connector: TlsConnector,
    port: u16,
    timeout: Duration,
}

impl std::fmt::Debug for TlsProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsProbe")
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TlsProbe {
    pub fn new(timeout: Duration) -> Self {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            connector: TlsConnector::from(Arc::new(config)),
            port: 443,
            timeout,
        }
    }

    /// Overrides the port probed
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub async fn check(&self, domain: &str) -> SslStatus {
        let server_name = match ServerName::try_from(domain.to_string()) {
            Ok(name) => name,
            Err(e) => return SslStatus::unknown(format!("invalid server name: {}", e)),
        };

        let sock = match tokio::time::timeout(
            self.timeout,
            TcpStream::connect((domain, self.port)),
        )
        .await
        {
            Ok(Ok(sock)) => sock,
            Ok(Err(e)) => return SslStatus::unknown(format!("connect failed: {}", e)),
            Err(_) => return SslStatus::unknown("connect timed out"),
        };

        let stream = match tokio::time::timeout(
            self.timeout,
            self.connector.connect(server_name, sock),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                debug!("TLS handshake with {} rejected: {}", domain, e);
                return SslStatus::Invalid {
                    reason: e.to_string(),
                };
            }
            Err(_) => return SslStatus::unknown("handshake timed out"),
        };

        let Some(leaf) = stream
            .get_ref()
            .1
            .peer_certificates()
            .and_then(|certs| certs.first())
        else {
            return SslStatus::unknown("no peer certificate");
        };

        match x509_parser::parse_x509_certificate(leaf.as_ref()) {
            Ok((_, cert)) => {
                let not_after = cert.tbs_certificate.validity.not_after.timestamp();
                SslStatus::Valid {
                    expires_in_days: days_until(not_after, Utc::now().timestamp()),
                }
            }
            Err(e) => SslStatus::unknown(format!("certificate parse failed: {}", e)),
        }
    }
}

fn days_until(not_after: i64, now: i64) -> i64 {
    (not_after - now).div_euclid(86_400)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_until() {
        assert_eq!(days_until(86_400 * 30 + 10, 0), 30);
        assert_eq!(days_until(0, 10), -1);
    }

    #[test]
    fn test_serialization() {
        let valid = serde_json::to_value(SslStatus::Valid { expires_in_days: 42 }).unwrap();
        assert_eq!(valid, serde_json::json!({"status": "valid", "expires_in_days": 42}));

        let unknown = serde_json::to_value(SslStatus::unknown("connect timed out")).unwrap();
        assert_eq!(unknown["status"], "unknown");
    }

    #[tokio::test]
    async fn test_closed_port_is_unknown() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = TlsProbe::new(Duration::from_secs(2)).with_port(port);
        let status = probe.check("127.0.0.1").await;
        assert!(matches!(status, SslStatus::Unknown { .. }));
    }

    #[tokio::test]
    async fn test_plaintext_server_is_invalid() {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let _ = sock.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n").await;
            }
        });

        let probe = TlsProbe::new(Duration::from_secs(2)).with_port(port);
        let status = probe.check("127.0.0.1").await;
        assert!(matches!(status, SslStatus::Invalid { .. }));
    }
}
