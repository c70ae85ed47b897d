//! Report renderer trait and report data
//!
//! A `Report` bundles the enriched records with the context they were
//! produced in. Renderers turn it into a complete document.

use crate::output::stats::EnrichmentStats;
use crate::release::EnrichedRecord;
use chrono::{DateTime, Local};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything a renderer needs to produce a report
#[derive(Debug, Clone)]
pub struct Report {
    /// Document heading
    pub title: String,

    /// When the report was generated
    pub generated_at: DateTime<Local>,

    /// Genres that were searched
    pub genres: Vec<String>,

    /// Human-readable release window (e.g. "2025-03-01 to 2025-03-31")
    pub window: String,

    /// Fingerprint of the configuration file, if known
    pub config_hash: Option<String>,

    /// Enriched records in catalog order
    pub records: Vec<EnrichedRecord>,

    /// Statistics of the enrichment run
    pub stats: EnrichmentStats,
}

impl Report {
    /// Creates a report stamped with the current local time
    pub fn new(title: impl Into<String>, records: Vec<EnrichedRecord>) -> Self {
        Self {
            title: title.into(),
            generated_at: Local::now(),
            genres: Vec::new(),
            window: String::new(),
            config_hash: None,
            stats: EnrichmentStats::new(records.len()),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trait for report renderers
///
/// Renderers consume the records in order and emit one row per record with
/// the columns Band, Record Name, Genre, Release Date, Record Label.
pub trait ReportRenderer {
    /// Renders the full document
    fn render(&self, report: &Report) -> String;

    /// Conventional file extension for this format
    fn extension(&self) -> &'static str;
}
