use serde::Deserialize;
use std::time::Duration;

/// Default search endpoint of the Metal Archives advanced album search
pub const DEFAULT_ENDPOINT: &str =
    "https://www.metal-archives.com/search/ajax-advanced/searching/albums";

/// Main configuration structure for Release-Radar
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Catalog search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Genres to search for, joined with spaces in the query
    pub genres: Vec<String>,

    /// How many days back from today the release window reaches
    #[serde(rename = "days-back", default = "default_days_back")]
    pub days_back: u32,

    /// Search endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout for the bulk search request (seconds)
    #[serde(rename = "query-timeout", default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl SearchConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }
}

/// Release-date enrichment configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    /// Maximum number of album pages fetched at once
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Timeout for a single album page fetch (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Wall-clock budget for the whole enrichment phase (seconds)
    #[serde(rename = "total-budget", default = "default_total_budget")]
    pub total_budget: u64,

    /// Number of HTTP 429 responses after which enrichment stops
    #[serde(rename = "max-rate-limit-hits", default = "default_max_rate_limit_hits")]
    pub max_rate_limit_hits: u32,

    /// Lower bound of the random delay before each album page fetch (milliseconds)
    #[serde(rename = "jitter-min-ms", default = "default_jitter_min_ms")]
    pub jitter_min_ms: u64,

    /// Upper bound of the random delay before each album page fetch (milliseconds)
    #[serde(rename = "jitter-max-ms", default = "default_jitter_max_ms")]
    pub jitter_max_ms: u64,
}

impl EnrichmentConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn total_budget(&self) -> Duration {
        Duration::from_secs(self.total_budget)
    }

    pub fn jitter(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.jitter_min_ms),
            Duration::from_millis(self.jitter_max_ms),
        )
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            request_timeout: default_request_timeout(),
            total_budget: default_total_budget(),
            max_rate_limit_hits: default_max_rate_limit_hits(),
            jitter_min_ms: default_jitter_min_ms(),
            jitter_max_ms: default_jitter_max_ms(),
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the generated report
    #[serde(rename = "report-path", default = "default_report_path")]
    pub report_path: String,

    /// Report format
    #[serde(default)]
    pub format: ReportFormat,

    /// Report heading
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            format: ReportFormat::default(),
            title: default_title(),
        }
    }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Markdown,
}

fn default_days_back() -> u32 {
    30
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_query_timeout() -> u64 {
    10
}

fn default_concurrency() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    5
}

fn default_total_budget() -> u64 {
    60
}

fn default_max_rate_limit_hits() -> u32 {
    5
}

fn default_jitter_min_ms() -> u64 {
    400
}

fn default_jitter_max_ms() -> u64 {
    900
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_report_path() -> String {
    "report.html".to_string()
}

fn default_title() -> String {
    "New Metal Releases".to_string()
}
