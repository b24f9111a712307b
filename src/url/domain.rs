use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitelens::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the host without a leading `www.`
pub fn site_host(host: &str) -> String {
    let lower = host.to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Returns true when both URLs point at the same site
///
/// Hosts are compared case-insensitively with any `www.` prefix ignored.
/// Scheme and port are not considered.
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => site_host(a) == site_host(b),
        _ => false,
    }
}

/// Returns the last two labels of a domain name
///
/// Used as a fallback registration lookup for subdomains. Returns `None`
/// when the name already has two labels or fewer.
pub fn parent_domain(domain: &str) -> Option<String> {
    let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
    if labels.len() <= 2 {
        return None;
    }
    Some(labels[labels.len() - 2..].join("."))
}
