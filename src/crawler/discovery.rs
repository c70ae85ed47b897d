//! Candidate discovery via the catalog's advanced album search
//!
//! One request per run: the search endpoint answers with a JSON object whose
//! `aaData` field holds one array per album. Positional fields are HTML
//! fragments:
//!
//! | Index | Content |
//! |-------|---------|
//! | 0 | band name (linked) |
//! | 1 | album title, linking to the album page |
//! | 2 | release type |
//! | 3 | genre |
//! | 4 | label (optional) |

use crate::config::SearchConfig;
use crate::crawler::parser::{extract_link, strip_markup};
use crate::release::CandidateRecord;
use crate::DiscoveryError;
use chrono::{Days, Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Date format expected by the search endpoint
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive release-date window of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl SearchWindow {
    /// Window covering the last `days_back` days up to and including `today`
    pub fn ending_on(today: NaiveDate, days_back: u32) -> Self {
        let from = today
            .checked_sub_days(Days::new(u64::from(days_back)))
            .unwrap_or(NaiveDate::MIN);
        Self { from, to: today }
    }

    /// Window covering the last `days_back` days up to today's local date
    pub fn ending_today(days_back: u32) -> Self {
        Self::ending_on(Local::now().date_naive(), days_back)
    }

    /// Query parameters for the search endpoint
    pub fn query_params(&self, genres: &[String]) -> [(&'static str, String); 3] {
        [
            ("genre", genres.join(" ")),
            ("fromDate", self.from.format(QUERY_DATE_FORMAT).to_string()),
            ("toDate", self.to.format(QUERY_DATE_FORMAT).to_string()),
        ]
    }
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.from.format(QUERY_DATE_FORMAT),
            self.to.format(QUERY_DATE_FORMAT)
        )
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "aaData", default)]
    rows: Vec<Vec<Value>>,
}

/// Client for the catalog search endpoint
#[derive(Debug, Clone)]
pub struct Discovery {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl Discovery {
    /// Creates a discovery client for `endpoint`
    pub fn new(client: Client, endpoint: &str, timeout: Duration) -> Result<Self, DiscoveryError> {
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
            timeout,
        })
    }

    /// Creates a discovery client from the search settings
    pub fn from_config(client: Client, config: &SearchConfig) -> Result<Self, DiscoveryError> {
        Self::new(client, &config.endpoint, config.query_timeout())
    }

    /// Finds albums in `genres` released during the last `days_back` days
    ///
    /// Fails closed: any network, HTTP, or parse error is logged and yields an
    /// empty list, never a partial one.
    pub async fn discover(&self, genres: &[String], days_back: u32) -> Vec<CandidateRecord> {
        self.discover_in(genres, SearchWindow::ending_today(days_back))
            .await
    }

    /// Finds albums in `genres` released during `window`, failing closed
    pub async fn discover_in(&self, genres: &[String], window: SearchWindow) -> Vec<CandidateRecord> {
        match self.try_discover(genres, window).await {
            Ok(candidates) => {
                tracing::info!(
                    "Catalog search returned {} albums for {}",
                    candidates.len(),
                    window
                );
                candidates
            }
            Err(e) => {
                tracing::error!("Catalog search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Finds albums, surfacing the failure instead of swallowing it
    pub async fn try_discover(
        &self,
        genres: &[String],
        window: SearchWindow,
    ) -> Result<Vec<CandidateRecord>, DiscoveryError> {
        let url = self.endpoint.to_string();
        tracing::debug!("Querying {} for {:?} ({})", url, genres, window);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&window.query_params(genres))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| DiscoveryError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| DiscoveryError::Http { url, source })?;

        parse_search_response(&body, &self.endpoint)
    }
}

/// Parses a search response body into candidate records
///
/// Album links are resolved against `base_url`. Rows with fewer than four
/// fields are skipped.
pub fn parse_search_response(
    body: &str,
    base_url: &Url,
) -> Result<Vec<CandidateRecord>, DiscoveryError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let candidates = response
        .rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let candidate = parse_row(row, base_url);
            if candidate.is_none() {
                tracing::warn!(
                    "Skipping search row {} with {} fields (need at least 4)",
                    index,
                    row.len()
                );
            }
            candidate
        })
        .collect();

    Ok(candidates)
}

/// Converts one positional row into a candidate record
fn parse_row(row: &[Value], base_url: &Url) -> Option<CandidateRecord> {
    if row.len() < 4 {
        return None;
    }

    let album_fragment = field_text(&row[1]);

    Some(CandidateRecord {
        band: strip_markup(&field_text(&row[0])),
        album: strip_markup(&album_fragment),
        genre: strip_markup(&field_text(&row[3])),
        label: row
            .get(4)
            .map(|value| strip_markup(&field_text(value)))
            .unwrap_or_default(),
        detail_url: extract_link(&album_fragment).and_then(|href| resolve_link(&href, base_url)),
    })
}

/// Renders a JSON cell as text
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolves an album link to an absolute HTTP(S) URL
///
/// Returns None for `javascript:`, `mailto:` and other non-HTTP targets.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
