//! Outbound HTTP for page retrieval and link probing

mod fetcher;
mod link_health;

pub use fetcher::{build_http_client, classify_error, FetchError, FetchedPage, PageFetcher};
pub use link_health::{LinkHealth, LinkHealthChecker, ProbeOutcome};
