//! Configuration module for Sitelens
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and resolving optional collaborator credentials.
//!
//! # Example
//!
//! ```no_run
//! use sitelens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitelens.toml")).unwrap();
//! println!("Probes in flight: {}", config.links.max_concurrent_probes);
//! ```

mod capabilities;
mod parser;
mod types;
mod validation;

pub use capabilities::Capabilities;
pub use types::{
    CacheConfig, Config, DomainConfig, FetchConfig, FetchFailurePolicy, GenerativeTextConfig,
    LinkCheckConfig, PageSpeedConfig, SeoConfig, ServerConfig, UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
