use serde::Deserialize;

/// Main configuration structure for Sitelens
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub fetch: FetchConfig,
    pub links: LinkCheckConfig,
    pub seo: SeoConfig,
    pub domain: DomainConfig,
    #[serde(rename = "page-speed")]
    pub page_speed: PageSpeedConfig,
    #[serde(rename = "generative-text")]
    pub generative_text: GenerativeTextConfig,
    pub cache: CacheConfig,
}

/// What the orchestrator does when the page itself cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchFailurePolicy {
    /// Page-based analyzers fail; URL/domain-only analyzers still run
    #[default]
    PerAnalyzer,
    /// The whole analysis fails
    Global,
}

/// HTTP surface and request-level behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to
    #[serde(rename = "bind-address")]
    pub bind_address: String,

    /// Hard deadline for one complete analysis (seconds)
    ///
    /// Must cover the page fetch, the PageSpeed audit and the AI calls that
    /// follow it back to back.
    #[serde(rename = "request-deadline-secs")]
    pub request_deadline_secs: u64,

    #[serde(rename = "fetch-failure-policy")]
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_deadline_secs: 180,
            fetch_failure_policy: FetchFailurePolicy::PerAnalyzer,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Product token sent in the User-Agent header
    pub name: String,

    pub version: String,

    /// Optional URL with information about the analyzer
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "sitelens".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Page fetch limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Bodies larger than this are truncated
    #[serde(rename = "max-body-bytes")]
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_redirects: 5,
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Link-health fan-out limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkCheckConfig {
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Maximum number of probes in flight at once
    #[serde(rename = "max-concurrent-probes")]
    pub max_concurrent_probes: usize,

    /// Links past this count are recorded but not probed
    #[serde(rename = "max-links-checked")]
    pub max_links_checked: usize,
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_concurrent_probes: 16,
            max_links_checked: 150,
        }
    }
}

/// SEO analyzer options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    /// Enables the content-length, robots.txt and sitemap checks
    #[serde(rename = "extended-checks")]
    pub extended_checks: bool,

    #[serde(rename = "site-file-timeout-secs")]
    pub site_file_timeout_secs: u64,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            extended_checks: false,
            site_file_timeout_secs: 5,
        }
    }
}

/// Domain trust probes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Timeout applied to each of the RDAP, TLS and DNS probes
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Base URL of the RDAP bootstrap service
    #[serde(rename = "rdap-base-url")]
    pub rdap_base_url: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 5,
            rdap_base_url: "https://rdap.org".to_string(),
        }
    }
}

/// PageSpeed Insights collaborator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageSpeedConfig {
    /// Inline API key; takes precedence over `api-key-env`
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    pub endpoint: String,

    /// `desktop` or `mobile`
    pub strategy: String,

    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for PageSpeedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: Some("PAGESPEED_API_KEY".to_string()),
            endpoint: "https://www.googleapis.com/pagespeedonline/v5/runPagespeed".to_string(),
            strategy: "desktop".to_string(),
            timeout_secs: 90,
        }
    }
}

/// Generative-text collaborator (Gemini `generateContent`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerativeTextConfig {
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    pub endpoint: String,

    pub model: String,

    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for GenerativeTextConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: Some("GEMINI_API_KEY".to_string()),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Short-lived result cache backing report generation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(rename = "ttl-secs")]
    pub ttl_secs: u64,

    #[serde(rename = "max-entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 900,
            max_entries: 256,
        }
    }
}
