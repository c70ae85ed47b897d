//! Enrichment run statistics
//!
//! The coordinator fills an `EnrichmentStats` as it resolves candidates; the
//! CLI prints it and the renderers include it in the report.

use crate::state::{FetchOutcome, StopReason};
use std::time::Duration;

/// Counters describing one enrichment run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Candidates handed to the coordinator
    pub candidates: usize,

    /// Candidates that made it into the output
    pub resolved: usize,

    /// Resolved candidates that received a non-empty release date
    pub dated: usize,

    /// Fetches that succeeded but found no release date field
    pub missing_date: usize,

    /// Fetches answered with HTTP 429, including those of dropped candidates
    pub rate_limited: usize,

    /// Fetches that failed or timed out
    pub failed: usize,

    /// Candidates without an album page link (no fetch dispatched)
    pub without_link: usize,

    /// Why the run ended early, if it did
    pub stop_reason: Option<StopReason>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl EnrichmentStats {
    /// Creates empty statistics for a run over `candidates` records
    pub fn new(candidates: usize) -> Self {
        Self {
            candidates,
            ..Self::default()
        }
    }

    /// Records the outcome of one resolved candidate
    ///
    /// `None` stands for a candidate that had no album page to fetch.
    pub fn record(&mut self, outcome: Option<&FetchOutcome>) {
        self.resolved += 1;

        match outcome {
            None => self.without_link += 1,
            Some(FetchOutcome::Success(date)) if date.is_empty() => self.missing_date += 1,
            Some(FetchOutcome::Success(_)) => self.dated += 1,
            Some(FetchOutcome::RateLimited) => self.rate_limited += 1,
            Some(FetchOutcome::Failed(_)) => self.failed += 1,
        }
    }

    /// Candidates dropped because the run stopped early
    pub fn dropped(&self) -> usize {
        self.candidates.saturating_sub(self.resolved)
    }
}

/// Prints run statistics to stdout
pub fn print_statistics(stats: &EnrichmentStats) {
    println!("=== Enrichment Statistics ===\n");

    println!("Candidates: {}", stats.candidates);
    println!("Resolved: {}", stats.resolved);
    println!("Dropped: {}", stats.dropped());
    println!("Elapsed: {:.1}s", stats.elapsed.as_secs_f64());

    println!("\nOutcomes:");
    println!("  {:20} {}", "dated", stats.dated);
    println!("  {:20} {}", "no date on page", stats.missing_date);
    println!("  {:20} {}", "no album link", stats.without_link);
    println!("  {:20} {}", "rate limited", stats.rate_limited);
    println!("  {:20} {}", "failed", stats.failed);

    if let Some(reason) = stats.stop_reason {
        println!("\nStopped early: {}", reason);
    }
}
