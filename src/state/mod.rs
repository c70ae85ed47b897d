//! State module for tracking enrichment progress
//!
//! # Components
//!
//! - `FetchOutcome`: classification of a single detail-page fetch
//! - `StopReason`: why a run was truncated
//! - `ScrapeSession`: counters shared by the workers of one enrichment run

mod outcome;
mod session;

// Re-export main types
pub use outcome::{FetchOutcome, StopReason};
pub use session::ScrapeSession;
