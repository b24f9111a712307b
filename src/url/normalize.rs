use crate::InputError;
use url::Url;

/// Query parameters that only carry attribution and never change the resource
const TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "msclkid",
    "mc_eid",
    "mc_cid",
    "_ga",
    "ref",
];

/// Parses and validates an analysis target
///
/// The target must be an absolute `http` or `https` URL with a host.
///
/// # Examples
///
/// ```
/// use sitelens::url::parse_target_url;
///
/// let url = parse_target_url("  https://example.com/about ").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
/// assert!(parse_target_url("ftp://example.com").is_err());
/// ```
pub fn parse_target_url(input: &str) -> Result<Url, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingField("url"));
    }

    let url = Url::parse(trimmed).map_err(|e| InputError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(InputError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(InputError::MissingHost),
    }
}

/// Normalizes an absolute link so that equivalent hrefs compare equal
///
/// # Normalization Steps
///
/// 1. Host is lowercased and default ports dropped (done by `url` on parse)
/// 2. Fragment removed
/// 3. Empty and duplicate path segments collapsed, dot segments resolved
/// 4. Trailing slash removed (except for root `/`)
/// 5. Tracking query parameters removed, remaining ones sorted by key
///
/// The scheme and any `www.` prefix are kept:
/// `http://` and `https://` variants are probed separately.
///
/// # Examples
///
/// ```
/// use sitelens::url::normalize_link;
/// use url::Url;
///
/// let url = Url::parse("https://Example.com/docs/?utm_source=x&b=2&a=1#top").unwrap();
/// assert_eq!(normalize_link(&url).as_str(), "https://example.com/docs?a=1&b=2");
/// ```
pub fn normalize_link(url: &Url) -> Url {
    let mut url = url.clone();

    url.set_fragment(None);

    let path = normalize_path(url.path());
    url.set_path(&path);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    url
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort();
    params
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
