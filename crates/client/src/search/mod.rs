//! Asynchronous search job orchestration.
//!
//! Splunk runs searches as jobs: a POST creates the job and returns its id,
//! and the results endpoint only carries a `results` array once the job is
//! done. [`SearchOrchestrator`] hides that protocol behind a single call that
//! always yields a [`SearchOutcome`].
//!
//! # Submodules
//! - `request`: [`SearchRequest`] and [`JobHandle`]
//! - `outcome`: the success/failure envelope
//! - `error`: [`SearchError`], the failure classes behind the envelope
//! - `orchestrator`: submit, poll, normalize
//! - `derived`: log statistics and error searches

mod derived;
mod error;
mod orchestrator;
mod outcome;
mod request;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub use derived::{error_search_query, log_stats_query};
pub use error::SearchError;
pub use orchestrator::SearchOrchestrator;
pub use outcome::{IndexedOutcome, SearchOutcome};
pub use request::{JobHandle, SearchRequest};

/// Log-safe stand-in for a search query: its length and a hash.
pub fn redact_query(query: &str) -> String {
    let mut hasher = DefaultHasher::new();
    query.hash(&mut hasher);
    let hash = hasher.finish();
    format!("<{} chars, hash={:08x}>", query.len(), hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_query_hides_content() {
        let query = "index=main password=hunter2";
        let redacted = redact_query(query);
        assert!(redacted.starts_with("<27 chars, hash="));
        assert!(!redacted.contains("hunter2"));
        assert_eq!(redacted, redact_query(query));
    }
}
