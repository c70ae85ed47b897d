use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Horizon used when a budget is too large to add to the clock
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Per-run counters shared between the coordinator and its fetch workers
///
/// A session is created at the start of every enrichment run, so separate runs
/// never observe each other's rate-limit hits. Cloning is cheap and yields a
/// handle onto the same counters.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    /// Number of HTTP 429 responses observed so far
    rate_limit_hits: Arc<AtomicUsize>,

    /// When the run started
    started_at: Instant,

    /// Threshold at which the breaker trips
    max_rate_limit_hits: usize,

    /// Wall-clock allowance for the whole run
    total_budget: Duration,
}

impl ScrapeSession {
    /// Starts a new session clock with zeroed counters
    pub fn start(max_rate_limit_hits: usize, total_budget: Duration) -> Self {
        Self {
            rate_limit_hits: Arc::new(AtomicUsize::new(0)),
            started_at: Instant::now(),
            max_rate_limit_hits,
            total_budget,
        }
    }

    /// Records one rate-limit response and returns the new total
    pub fn record_rate_limit(&self) -> usize {
        self.rate_limit_hits.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns the number of rate-limit responses recorded so far
    pub fn rate_limit_hits(&self) -> usize {
        self.rate_limit_hits.load(Ordering::SeqCst)
    }

    /// Time elapsed since the session started
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Instant at which the total budget runs out
    ///
    /// Budgets past the clock's range are capped at a distant horizon.
    pub fn deadline(&self) -> Instant {
        self.started_at
            .checked_add(self.total_budget)
            .or_else(|| self.started_at.checked_add(FAR_FUTURE))
            .unwrap_or(self.started_at)
    }

    /// Returns true once the rate-limit counter has reached its threshold
    pub fn rate_limit_tripped(&self) -> bool {
        self.rate_limit_hits() >= self.max_rate_limit_hits
    }

    /// Returns true once more time than the total budget has elapsed
    pub fn budget_exceeded(&self) -> bool {
        self.elapsed() > self.total_budget
    }
}
