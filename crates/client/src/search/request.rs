//! Search inputs and the job handle produced by submission.

use std::num::NonZeroU64;

use splunk_config::constants::{DEFAULT_EARLIEST_TIME, DEFAULT_LATEST_TIME, DEFAULT_MAX_COUNT};

/// An ad-hoc search.
///
/// `query` is sent as `search <query>`; it is not validated or escaped.
/// The time bounds accept anything Splunk does (`-1h`, `@d`, epoch seconds).
/// `max_count` is non-zero because Splunk treats `count=0` as unlimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub earliest_time: String,
    pub latest_time: String,
    pub max_count: NonZeroU64,
}

impl SearchRequest {
    /// Search over the last hour, returning at most 100 rows.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            earliest_time: DEFAULT_EARLIEST_TIME.to_string(),
            latest_time: DEFAULT_LATEST_TIME.to_string(),
            max_count: DEFAULT_MAX_COUNT,
        }
    }

    pub fn with_earliest_time(mut self, earliest: impl Into<String>) -> Self {
        self.earliest_time = earliest.into();
        self
    }

    pub fn with_latest_time(mut self, latest: impl Into<String>) -> Self {
        self.latest_time = latest.into();
        self
    }

    pub fn with_max_count(mut self, max_count: NonZeroU64) -> Self {
        self.max_count = max_count;
        self
    }
}

/// A submitted search job.
///
/// Only the submitter creates handles. The query travels with the job id so
/// poll outcomes can be correlated with what was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    sid: String,
    query: String,
}

impl JobHandle {
    pub(crate) fn new(sid: String, query: String) -> Self {
        Self { sid, query }
    }

    /// Splunk job id.
    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = SearchRequest::new("index=main");
        assert_eq!(request.earliest_time, "-1h");
        assert_eq!(request.latest_time, "now");
        assert_eq!(request.max_count.get(), 100);
    }

    #[test]
    fn test_request_overrides() {
        let request = SearchRequest::new("index=main")
            .with_earliest_time("-24h")
            .with_latest_time("-1h")
            .with_max_count(NonZeroU64::new(5).unwrap());
        assert_eq!(request.earliest_time, "-24h");
        assert_eq!(request.latest_time, "-1h");
        assert_eq!(request.max_count.get(), 5);
    }
}
