//! Result polling policy for search jobs.
//!
//! Responsibilities:
//! - Describe how many times, and how often, a search job's results are polled.
//! - Describe what a single failed poll attempt does to the loop.
//!
//! Invariants:
//! - `max_attempts` is at least 1 once validated by the loader.
//! - The interval is constant between attempts (no backoff).

use std::time::Duration;

use crate::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_MAX_ATTEMPTS};

/// What the poller does when one attempt fails below the HTTP layer
/// (connection refused, TLS failure, request timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportFaultPolicy {
    /// Log the fault, count the attempt and keep polling.
    #[default]
    AbsorbAndRetry,
    /// End the orchestration with a failure carrying the fault.
    Abort,
}

/// Bounded, fixed-interval polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of result polls.
    pub max_attempts: u32,
    /// Spacing between two consecutive polls.
    pub interval: Duration,
    /// Handling of per-attempt transport faults.
    pub on_transport_fault: TransportFaultPolicy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            on_transport_fault: TransportFaultPolicy::default(),
        }
    }
}

impl PollPolicy {
    /// Time spent sleeping when no attempt succeeds. Every unsuccessful
    /// attempt, the last one included, is followed by one interval.
    pub fn worst_case_wait(&self) -> Duration {
        self.interval * self.max_attempts
    }
}
