use crate::config::types::{
    CacheConfig, Config, DomainConfig, FetchConfig, GenerativeTextConfig, LinkCheckConfig,
    PageSpeedConfig, ServerConfig, UserAgentConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_fetch_config(&config.fetch)?;
    validate_link_config(&config.links)?;
    validate_positive("seo.site-file-timeout-secs", config.seo.site_file_timeout_secs)?;
    validate_domain_config(&config.domain)?;
    validate_page_speed_config(&config.page_speed)?;
    validate_generative_config(&config.generative_text)?;
    validate_cache_config(&config.cache)?;
    validate_deadline_budget(config)
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "bind-address '{}' is not a socket address: {}",
            config.bind_address, e
        ))
    })?;

    validate_positive("server.request-deadline-secs", config.request_deadline_secs)
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        validate_url("user-agent.contact-url", contact)?;
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    validate_positive("fetch.timeout-secs", config.timeout_secs)?;

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "fetch.max-redirects must be at most 20, got {}",
            config.max_redirects
        )));
    }

    if config.max_body_bytes < 1024 {
        return Err(ConfigError::Validation(format!(
            "fetch.max-body-bytes must be >= 1024, got {}",
            config.max_body_bytes
        )));
    }

    Ok(())
}

fn validate_link_config(config: &LinkCheckConfig) -> Result<(), ConfigError> {
    validate_positive("links.timeout-secs", config.timeout_secs)?;

    if config.max_concurrent_probes < 1 || config.max_concurrent_probes > 100 {
        return Err(ConfigError::Validation(format!(
            "links.max-concurrent-probes must be between 1 and 100, got {}",
            config.max_concurrent_probes
        )));
    }

    Ok(())
}

fn validate_domain_config(config: &DomainConfig) -> Result<(), ConfigError> {
    validate_positive("domain.probe-timeout-secs", config.probe_timeout_secs)?;
    validate_url("domain.rdap-base-url", &config.rdap_base_url)
}

fn validate_page_speed_config(config: &PageSpeedConfig) -> Result<(), ConfigError> {
    validate_positive("page-speed.timeout-secs", config.timeout_secs)?;
    validate_url("page-speed.endpoint", &config.endpoint)?;

    if config.strategy != "desktop" && config.strategy != "mobile" {
        return Err(ConfigError::Validation(format!(
            "page-speed.strategy must be 'desktop' or 'mobile', got '{}'",
            config.strategy
        )));
    }

    Ok(())
}

fn validate_generative_config(config: &GenerativeTextConfig) -> Result<(), ConfigError> {
    validate_positive("generative-text.timeout-secs", config.timeout_secs)?;
    validate_url("generative-text.endpoint", &config.endpoint)?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "generative-text.model cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    validate_positive("cache.ttl-secs", config.ttl_secs)?;

    if config.max_entries == 0 {
        return Err(ConfigError::Validation(
            "cache.max-entries must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// The AI insight starts only after the fetch and the PageSpeed audit have
/// settled, so the deadline has to leave it a full call timeout.
fn validate_deadline_budget(config: &Config) -> Result<(), ConfigError> {
    let needed = config
        .fetch
        .timeout_secs
        .saturating_add(config.page_speed.timeout_secs)
        .saturating_add(config.generative_text.timeout_secs);

    if config.server.request_deadline_secs < needed {
        return Err(ConfigError::Validation(format!(
            "server.request-deadline-secs must be >= fetch.timeout-secs + page-speed.timeout-secs \
             + generative-text.timeout-secs ({} + {} + {} = {}), got {}",
            config.fetch.timeout_secs,
            config.page_speed.timeout_secs,
            config.generative_text.timeout_secs,
            needed,
            config.server.request_deadline_secs
        )));
    }

    Ok(())
}

fn validate_positive(key: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!("{} must be >= 1", key)));
    }
    Ok(())
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            key, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_bad_bind_address() {
        let mut config = Config::default();
        config.server.bind_address = "localhost".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_user_agent_name() {
        let mut config = Config::default();
        config.user_agent.name = "bad name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_link_check_bounds() {
        let mut config = Config::default();
        config.links.max_concurrent_probes = 101;
        assert!(validate(&config).is_err());

        config.links.max_concurrent_probes = 20;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = Config::default();
        config.page_speed.endpoint = "ftp://example.com/run".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_page_speed_strategy() {
        let mut config = Config::default();
        config.page_speed.strategy = "tablet".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_deadline_covers_sequential_calls() {
        let config = Config::default();
        assert!(
            config.server.request_deadline_secs
                >= config.fetch.timeout_secs
                    + config.page_speed.timeout_secs
                    + config.generative_text.timeout_secs
        );

        let mut config = Config::default();
        config.server.request_deadline_secs = 120;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("15 + 90 + 60 = 165"));

        config.page_speed.timeout_secs = 45;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = Config::default();
        config.domain.probe_timeout_secs = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.cache.max_entries = 0;
        assert!(validate(&config).is_err());
    }
}
