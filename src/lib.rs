//! Sitelens: concurrent website analysis
//!
//! Given a URL, this crate fetches the page once and fans out to several
//! independent analyzers (SEO, UX heuristics, domain trust, page-speed audit,
//! AI insight). Partial failures are tolerated and folded into one scored,
//! fully-keyed report.

pub mod analyzers;
pub mod config;
pub mod fetch;
pub mod orchestrator;
pub mod output;
pub mod robots;
pub mod server;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Sitelens operations
#[derive(Debug, Error)]
pub enum SitelensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: fetch::FetchError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Result store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Report rendering error: {0}")]
    Render(#[from] output::RenderError),

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition {
        from: orchestrator::AnalysisPhase,
        to: orchestrator::AnalysisPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while validating caller input, before any work starts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Only http and https URLs are supported, got: {0}")]
    InvalidScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Result type alias for Sitelens operations
pub type Result<T> = std::result::Result<T, SitelensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Capabilities, Config};
pub use orchestrator::{AnalysisRequest, AnalysisResult, ArticleRequest, Language, Orchestrator};
