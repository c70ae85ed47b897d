//! Crawler module for catalog search and release-date enrichment
//!
//! This module contains the scanning pipeline:
//! - Candidate discovery through the catalog's bulk search
//! - HTML fragment and album page parsing
//! - Throttled album page fetching
//! - Bounded, ordered enrichment coordination

mod coordinator;
mod discovery;
mod fetcher;
mod parser;

pub use coordinator::{enrich, Coordinator, EnrichmentOutcome, EnrichmentSettings};
pub use discovery::{parse_search_response, Discovery, SearchWindow};
pub use fetcher::{build_http_client, DetailFetcher};
pub use parser::{extract_link, extract_release_date, strip_markup};

use crate::config::Config;
use crate::RadarError;

/// Everything one scan produced
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Release window that was searched
    pub window: SearchWindow,

    /// Enriched records and run statistics
    pub enrichment: EnrichmentOutcome,
}

/// Runs a complete scan
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client
/// 2. Query the catalog for candidates in the configured window
/// 3. Enrich candidates with release dates
///
/// Upstream failures never surface here: a failed search produces an empty
/// result and failed album fetches produce empty dates.
///
/// # Returns
///
/// * `Ok(ScanResult)` - Scan ran (possibly with no releases found)
/// * `Err(RadarError)` - The HTTP client or endpoint could not be set up
pub async fn scan(config: &Config) -> Result<ScanResult, RadarError> {
    let client = build_http_client(&config.user_agent)?;
    let window = SearchWindow::ending_today(config.search.days_back);

    let candidates = match Discovery::from_config(client.clone(), &config.search) {
        Ok(discovery) => discovery.discover_in(&config.search.genres, window).await,
        Err(e) => {
            tracing::error!("Catalog search failed: {}", e);
            Vec::new()
        }
    };

    let fetcher = DetailFetcher::from_config(client, config);
    let coordinator = Coordinator::new(
        fetcher,
        EnrichmentSettings::from_config(&config.enrichment),
    );
    let enrichment = coordinator.run(candidates).await;

    Ok(ScanResult { window, enrichment })
}
