//! URL handling for Sitelens
//!
//! Target validation, link normalization for deduplication, and host
//! comparison for internal/external classification.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_same_site, parent_domain, site_host};
pub use normalize::{normalize_link, parse_target_url};
