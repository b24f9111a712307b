//! Optional collaborator capabilities
//!
//! API keys are resolved once, here, and the result is injected into the
//! orchestrator. Nothing else in the crate reads environment variables.

use crate::config::types::Config;

/// Which optional collaborators are usable, with their credentials
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Key for the PageSpeed Insights API
    pub page_speed_key: Option<String>,

    /// Key for the generative-text API
    pub generative_key: Option<String>,
}

impl Capabilities {
    /// Resolves capabilities from the configuration and the process environment
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_speed_key: resolve_key(
                config.page_speed.api_key.as_deref(),
                config.page_speed.api_key_env.as_deref(),
            ),
            generative_key: resolve_key(
                config.generative_text.api_key.as_deref(),
                config.generative_text.api_key_env.as_deref(),
            ),
        }
    }

    /// No optional collaborators at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn page_speed_enabled(&self) -> bool {
        self.page_speed_key.is_some()
    }

    pub fn generative_text_enabled(&self) -> bool {
        self.generative_key.is_some()
    }
}

// Keys never appear in logs.
impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("page_speed", &self.page_speed_enabled())
            .field("generative_text", &self.generative_text_enabled())
            .finish()
    }
}

fn resolve_key(inline: Option<&str>, env_name: Option<&str>) -> Option<String> {
    let inline = inline
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string);

    inline.or_else(|| {
        env_name
            .and_then(|name| std::env::var(name).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    })
}
