//! Canned searches built on top of the orchestrator.

use std::num::NonZeroU64;

use splunk_config::constants::{DEFAULT_LATEST_TIME, DEFAULT_MAX_COUNT};

use crate::cancellation::CancellationToken;
use crate::search::{IndexedOutcome, SearchOrchestrator, SearchOutcome, SearchRequest};
use crate::transport::Transport;

/// Event counts per sourcetype for one index.
pub fn log_stats_query(index: &str) -> String {
    format!("index={index} | stats count by sourcetype")
}

/// Events mentioning common error words in `index`.
pub fn error_search_query(index: &str) -> String {
    format!("index={index} (error OR ERROR OR exception OR Exception OR failed OR FAILED)")
}

impl<T: Transport> SearchOrchestrator<T> {
    /// Sourcetype breakdown of `index` from `time_range` until now.
    pub async fn get_log_stats(
        &self,
        index: &str,
        time_range: &str,
        cancel: &CancellationToken,
    ) -> IndexedOutcome {
        let request = SearchRequest::new(log_stats_query(index))
            .with_earliest_time(time_range)
            .with_latest_time(DEFAULT_LATEST_TIME)
            .with_max_count(DEFAULT_MAX_COUNT);

        IndexedOutcome {
            index: index.to_string(),
            outcome: self.run_with_cancel(&request, cancel).await,
        }
    }

    /// Recent error-looking events in `index` (`*` for all indexes).
    pub async fn search_errors(
        &self,
        index: &str,
        time_range: &str,
        max_count: NonZeroU64,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        let request = SearchRequest::new(error_search_query(index))
            .with_earliest_time(time_range)
            .with_max_count(max_count);

        self.run_with_cancel(&request, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;
    use splunk_config::PollPolicy;

    #[test]
    fn test_query_templates() {
        assert_eq!(
            log_stats_query("main"),
            "index=main | stats count by sourcetype"
        );
        assert_eq!(
            error_search_query("*"),
            "index=* (error OR ERROR OR exception OR Exception OR failed OR FAILED)"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_stats_failure_carries_index() {
        let orch = SearchOrchestrator::new(
            Arc::new(ScriptedTransport::new().then_respond(500, "")),
            PollPolicy::default(),
        );

        let outcome = orch
            .get_log_stats("security", "-4h", &CancellationToken::new())
            .await;

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["index"], json!("security"));
        assert_eq!(
            value["query"],
            json!("index=security | stats count by sourcetype")
        );

        let submit = &orch.transport().requests()[0];
        assert_eq!(submit.param("earliest_time"), Some("-4h"));
        assert_eq!(submit.param("latest_time"), Some("now"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_errors_forwards_max_count() {
        let orch = SearchOrchestrator::new(
            Arc::new(
                ScriptedTransport::new()
                    .then_sid("3")
                    .then_results(json!([{"_raw": "ERROR disk full"}])),
            ),
            PollPolicy::default(),
        );

        let outcome = orch
            .search_errors("*", "-1h", NonZeroU64::new(50).unwrap(), &CancellationToken::new())
            .await;

        assert!(outcome.is_success());
        let requests = orch.transport().requests();
        assert_eq!(
            requests[0].param("search"),
            Some("search index=* (error OR ERROR OR exception OR Exception OR failed OR FAILED)")
        );
        assert_eq!(requests[1].param("count"), Some("50"));
    }
}
