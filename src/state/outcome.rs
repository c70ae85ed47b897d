/// Outcome definitions for detail-page fetches and enrichment runs
///
/// A `FetchOutcome` is produced once per detail fetch and consumed right away by
/// the coordinator; a `StopReason` records why a run ended before exhausting its
/// candidates.
use std::fmt;

/// Result of a single detail-page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page fetched and parsed; the date is empty when the page has no
    /// "Release date" field
    Success(String),

    /// Upstream answered HTTP 429
    RateLimited,

    /// Network error, timeout, or non-success status. The reason is for logs only.
    Failed(String),
}

impl FetchOutcome {
    /// Returns the release date this outcome contributes to a record
    ///
    /// Anything other than a successful fetch yields an empty date.
    pub fn release_date(&self) -> &str {
        match self {
            Self::Success(date) => date,
            Self::RateLimited | Self::Failed(_) => "",
        }
    }

    /// Returns true if this outcome counts toward the rate-limit breaker
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(date) if date.is_empty() => write!(f, "success (no date)"),
            Self::Success(date) => write!(f, "success ({})", date),
            Self::RateLimited => write!(f, "rate limited"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Why an enrichment run stopped before resolving every candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The rate-limit counter reached its threshold
    RateLimited,

    /// The wall-clock budget ran out
    BudgetExceeded,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "too many rate-limit responses"),
            Self::BudgetExceeded => write!(f, "total time budget exceeded"),
        }
    }
}
