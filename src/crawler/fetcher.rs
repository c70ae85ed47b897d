//! HTTP fetcher for album detail pages
//!
//! This module handles:
//! - Building the shared HTTP client with a browser-like user agent
//! - Throttling each request with a random pre-request delay
//! - Classifying responses into `FetchOutcome`s
//!
//! Every call makes exactly one network attempt; there are no retries.

use crate::config::{Config, UserAgentConfig};
use crate::crawler::parser::extract_release_date;
use crate::state::FetchOutcome;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Example
///
/// ```no_run
/// use release_radar::config::UserAgentConfig;
/// use release_radar::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     value: "Mozilla/5.0".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.clone())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches album pages and reads their release date
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DetailFetcher {
    client: Client,
    jitter_min: Duration,
    jitter_max: Duration,
}

impl DetailFetcher {
    /// Creates a fetcher that sleeps between `jitter_min` and `jitter_max`
    /// before every request
    pub fn new(client: Client, jitter_min: Duration, jitter_max: Duration) -> Self {
        Self {
            client,
            jitter_min,
            jitter_max: jitter_max.max(jitter_min),
        }
    }

    /// Creates a fetcher from the enrichment settings
    pub fn from_config(client: Client, config: &Config) -> Self {
        let (min, max) = config.enrichment.jitter();
        Self::new(client, min, max)
    }

    /// Upper bound of the pre-request delay
    pub fn max_jitter(&self) -> Duration {
        self.jitter_max
    }

    /// Fetches one album page and extracts its release date
    ///
    /// # Classification
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | HTTP 2xx, "Release date" field present | `Success(date)` |
    /// | HTTP 2xx, field absent | `Success("")` |
    /// | HTTP 429 | `RateLimited` |
    /// | Other status | `Failed` |
    /// | Timeout, connection or body error | `Failed` |
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the album page
    /// * `timeout` - Ceiling for the network request (the jitter delay is not counted)
    pub async fn fetch_detail_date(&self, url: &str, timeout: Duration) -> FetchOutcome {
        tokio::time::sleep(self.jitter_delay()).await;

        let response = match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = classify_error(&e);
                tracing::warn!("Date fetch error for {}: {}", url, reason);
                return FetchOutcome::Failed(reason);
            }
        };

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Rate limited (429) on {}", url);
            return FetchOutcome::RateLimited;
        }

        if !status.is_success() {
            tracing::warn!("Date fetch error for {}: HTTP {}", url, status.as_u16());
            return FetchOutcome::Failed(format!("HTTP {}", status.as_u16()));
        }

        match response.text().await {
            Ok(body) => {
                let date = extract_release_date(&body).unwrap_or_default();
                if date.is_empty() {
                    tracing::debug!("No release date on {}", url);
                }
                FetchOutcome::Success(date)
            }
            Err(e) => {
                let reason = classify_error(&e);
                tracing::warn!("Date fetch error for {}: {}", url, reason);
                FetchOutcome::Failed(reason)
            }
        }
    }

    /// Picks a uniformly random delay within the jitter window
    fn jitter_delay(&self) -> Duration {
        if self.jitter_max <= self.jitter_min {
            return self.jitter_min;
        }
        rand::thread_rng().gen_range(self.jitter_min..=self.jitter_max)
    }
}

/// Describes a request error for logs
fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}
