//! Release-Radar: a new-release scanner for the Metal Archives catalog
//!
//! This crate discovers recently released albums in a set of genres, enriches
//! each album with its exact release date from the album's own page, and
//! renders the results as a report. The date lookups run through a bounded
//! worker pool guarded by a rate-limit circuit breaker and a wall-clock budget.

pub mod config;
pub mod crawler;
pub mod output;
pub mod release;
pub mod state;

use thiserror::Error;

/// Main error type for Release-Radar operations
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

/// Failures of the bulk catalog query
///
/// These never escape discovery: a failed query is logged and treated as an
/// empty result set.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Search request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Search endpoint {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed search response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid search endpoint: {0}")]
    Endpoint(#[from] ::url::ParseError),
}

/// Result type alias for Release-Radar operations
pub type Result<T> = std::result::Result<T, RadarError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use release::{CandidateRecord, EnrichedRecord};
pub use state::{FetchOutcome, ScrapeSession, StopReason};
