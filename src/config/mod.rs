//! Configuration module for Release-Radar
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Only `[search].genres` is required; every other setting has a default.
//!
//! # Example
//!
//! ```no_run
//! use release_radar::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Looking back {} days", config.search.days_back);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EnrichmentConfig, OutputConfig, ReportFormat, SearchConfig, UserAgentConfig,
    DEFAULT_ENDPOINT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
