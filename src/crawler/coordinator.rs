//! Enrichment coordinator - bounded, ordered release-date lookups
//!
//! This module fans album page fetches out over a semaphore-bounded pool of
//! tokio tasks and folds the results back in input order. Each time a candidate
//! resolves, two stop predicates are evaluated in order:
//! - the rate-limit breaker (too many HTTP 429 responses), checked before the
//!   candidate is kept
//! - the wall-clock budget for the whole run, checked after it is kept
//!
//! When either trips, unresolved candidates are dropped from the output and
//! their tasks are aborted without waiting for them.

use crate::config::EnrichmentConfig;
use crate::crawler::fetcher::DetailFetcher;
use crate::output::EnrichmentStats;
use crate::release::{CandidateRecord, EnrichedRecord};
use crate::state::{FetchOutcome, ScrapeSession, StopReason};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Limits applied to one enrichment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentSettings {
    /// Maximum number of fetches in flight
    pub concurrency: usize,

    /// Ceiling for a single album page request
    pub per_fetch_timeout: Duration,

    /// Wall-clock allowance for the whole run
    pub total_budget: Duration,

    /// Number of 429 responses that stops the run
    pub max_rate_limit_hits: usize,
}

impl EnrichmentSettings {
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            concurrency: config.concurrency as usize,
            per_fetch_timeout: config.request_timeout(),
            total_budget: config.total_budget(),
            max_rate_limit_hits: config.max_rate_limit_hits as usize,
        }
    }
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self::from_config(&EnrichmentConfig::default())
    }
}

/// Records produced by a run together with its statistics
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    /// Resolved prefix of the input, in input order
    pub records: Vec<EnrichedRecord>,

    pub stats: EnrichmentStats,
}

/// A candidate waiting to be resolved, with its fetch task if it has one
struct Pending {
    candidate: CandidateRecord,
    task: Option<JoinHandle<FetchOutcome>>,
}

/// Main enrichment coordinator structure
#[derive(Debug, Clone)]
pub struct Coordinator {
    fetcher: DetailFetcher,
    settings: EnrichmentSettings,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// A concurrency of zero is raised to one.
    pub fn new(fetcher: DetailFetcher, settings: EnrichmentSettings) -> Self {
        Self {
            fetcher,
            settings: EnrichmentSettings {
                concurrency: settings.concurrency.max(1),
                ..settings
            },
        }
    }

    pub fn settings(&self) -> &EnrichmentSettings {
        &self.settings
    }

    /// Enriches candidates with release dates
    ///
    /// All fetch tasks are spawned up front and wait on the shared semaphore,
    /// so at most `concurrency` requests are in flight. Results are consumed in
    /// input order; candidates without an album link resolve immediately with an
    /// empty date.
    ///
    /// # Returns
    ///
    /// The resolved prefix of `candidates` and run statistics. Never fails:
    /// fetch errors become empty dates and stop conditions truncate the output.
    pub async fn run(&self, candidates: Vec<CandidateRecord>) -> EnrichmentOutcome {
        let session = ScrapeSession::start(
            self.settings.max_rate_limit_hits,
            self.settings.total_budget,
        );
        let mut stats = EnrichmentStats::new(candidates.len());

        tracing::info!(
            "Enriching {} candidates ({} workers, {:?} per fetch, {:?} budget)",
            candidates.len(),
            self.settings.concurrency,
            self.settings.per_fetch_timeout,
            self.settings.total_budget
        );

        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency));
        let pending: Vec<Pending> = candidates
            .into_iter()
            .map(|candidate| {
                let task = candidate
                    .detail_url
                    .clone()
                    .map(|url| self.spawn_fetch(url, Arc::clone(&semaphore), session.clone()));
                Pending { candidate, task }
            })
            .collect();

        let deadline = session.deadline();
        let mut records = Vec::with_capacity(pending.len());
        let mut queue = pending.into_iter();

        while let Some(Pending { candidate, task }) = queue.next() {
            let outcome = match task {
                None => None,
                Some(mut handle) => match tokio::time::timeout_at(deadline, &mut handle).await {
                    Ok(Ok(outcome)) => Some(outcome),
                    Ok(Err(e)) => Some(FetchOutcome::Failed(format!("fetch task failed: {}", e))),
                    Err(_) => {
                        // Budget ran out while this candidate was still pending
                        handle.abort();
                        stats.stop_reason = Some(StopReason::BudgetExceeded);
                        break;
                    }
                },
            };

            // A tripped breaker also discards the candidate that observed it
            if session.rate_limit_tripped() {
                stats.stop_reason = Some(StopReason::RateLimited);
                break;
            }

            stats.record(outcome.as_ref());
            let release_date = outcome
                .as_ref()
                .map(FetchOutcome::release_date)
                .unwrap_or_default()
                .to_string();
            records.push(candidate.enrich(release_date));

            if records.len() % 10 == 0 {
                tracing::info!(
                    "Progress: {}/{} albums resolved, {} rate-limit hits, {:.1}s elapsed",
                    records.len(),
                    stats.candidates,
                    session.rate_limit_hits(),
                    session.elapsed().as_secs_f64()
                );
            }

            if session.budget_exceeded() {
                stats.stop_reason = Some(StopReason::BudgetExceeded);
                break;
            }
        }

        // Abandon whatever is still queued or in flight
        for Pending { task, .. } in queue {
            if let Some(handle) = task {
                handle.abort();
            }
        }

        // Include 429s from the tripping candidate and from fetches that were dropped
        stats.rate_limited = session.rate_limit_hits();

        match stats.stop_reason {
            Some(StopReason::RateLimited) => tracing::warn!(
                "Stopping early: {} rate-limit responses (limit {}), {} albums dropped",
                session.rate_limit_hits(),
                self.settings.max_rate_limit_hits,
                stats.dropped()
            ),
            Some(StopReason::BudgetExceeded) => tracing::warn!(
                "Stopping early: enrichment exceeded {:?}, {} albums dropped",
                self.settings.total_budget,
                stats.dropped()
            ),
            None => {}
        }

        stats.elapsed = session.elapsed();
        tracing::info!(
            "Enrichment finished: {} of {} albums resolved in {:.1}s",
            records.len(),
            stats.candidates,
            stats.elapsed.as_secs_f64()
        );

        EnrichmentOutcome { records, stats }
    }

    /// Spawns the fetch task for one album page
    ///
    /// The task waits for a pool permit, then fetches under a hard ceiling of the
    /// request timeout plus the largest jitter delay. A task that overruns the
    /// ceiling resolves as `Failed`, never as `RateLimited`.
    fn spawn_fetch(
        &self,
        url: String,
        semaphore: Arc<Semaphore>,
        session: ScrapeSession,
    ) -> JoinHandle<FetchOutcome> {
        let fetcher = self.fetcher.clone();
        let per_fetch_timeout = self.settings.per_fetch_timeout;
        let ceiling = per_fetch_timeout.saturating_add(fetcher.max_jitter());

        tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return FetchOutcome::Failed("worker pool closed".to_string()),
            };

            let outcome = match tokio::time::timeout(
                ceiling,
                fetcher.fetch_detail_date(&url, per_fetch_timeout),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!("Date fetch for {} exceeded {:?}", url, ceiling);
                    FetchOutcome::Failed(format!("no response within {:?}", ceiling))
                }
            };

            tracing::debug!("Album page {}: {}", url, outcome);

            if outcome.is_rate_limited() {
                let hits = session.record_rate_limit();
                tracing::debug!("Rate-limit hits so far: {}", hits);
            }

            outcome
        })
    }
}

/// Enriches candidates and returns only the records
///
/// Convenience wrapper around [`Coordinator::run`].
pub async fn enrich(
    fetcher: &DetailFetcher,
    candidates: Vec<CandidateRecord>,
    concurrency: usize,
    per_fetch_timeout: Duration,
    total_budget: Duration,
    max_rate_limit_hits: usize,
) -> Vec<EnrichedRecord> {
    let settings = EnrichmentSettings {
        concurrency,
        per_fetch_timeout,
        total_budget,
        max_rate_limit_hits,
    };

    Coordinator::new(fetcher.clone(), settings)
        .run(candidates)
        .await
        .records
}
