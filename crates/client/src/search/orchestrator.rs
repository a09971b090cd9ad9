//! Submit, poll and normalize.
//!
//! Responsibilities:
//! - Create the search job and keep its id together with the query.
//! - Poll the results endpoint on a fixed interval under a bounded budget.
//! - Turn every fault into a `SearchOutcome::Failure`.
//!
//! Does NOT handle:
//! - Cancelling the job on the Splunk side. A cancelled or timed-out job is
//!   left for Splunk to expire.
//!
//! Invariants:
//! - At most `max_attempts` results requests per job.
//! - The first successful attempt returns immediately.
//! - Each unsuccessful attempt is followed by exactly one `interval` sleep,
//!   raced against the cancellation token.

use std::num::NonZeroU64;
use std::sync::Arc;

use splunk_config::{PollPolicy, TransportFaultPolicy};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cancellation::CancellationToken;
use crate::endpoints::{create_job, fetch_results};
use crate::metrics::{MetricsCollector, SearchOutcomeLabel};
use crate::models::{SearchRecord, parse_results_page};
use crate::search::{JobHandle, SearchError, SearchOutcome, SearchRequest, redact_query};
use crate::transport::Transport;

/// Runs searches against one transport under one poll policy.
#[derive(Debug)]
pub struct SearchOrchestrator<T> {
    transport: Arc<T>,
    policy: PollPolicy,
    metrics: MetricsCollector,
}

impl<T> Clone for SearchOrchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            policy: self.policy,
            metrics: self.metrics,
        }
    }
}

impl<T: Transport> SearchOrchestrator<T> {
    pub fn new(transport: Arc<T>, policy: PollPolicy) -> Self {
        Self {
            transport,
            policy,
            metrics: MetricsCollector::default(),
        }
    }

    /// Record poll attempts and outcomes with `metrics`.
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Create the search job.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Submission`] when the request fails, Splunk
    /// answers with a non-success status, or the response has no job id.
    pub async fn submit(&self, request: &SearchRequest) -> Result<JobHandle, SearchError> {
        let sid = create_job(
            self.transport.as_ref(),
            &request.query,
            &request.earliest_time,
            &request.latest_time,
        )
        .await?
        .ok_or_else(SearchError::missing_sid)?;

        debug!(sid = %sid, query = %redact_query(&request.query), "Submitted search job");
        Ok(JobHandle::new(sid, request.query.clone()))
    }

    /// Poll a submitted job until results arrive or the budget runs out.
    pub async fn poll(&self, handle: &JobHandle, max_count: NonZeroU64) -> SearchOutcome {
        self.poll_with_cancel(handle, max_count, &CancellationToken::new())
            .await
    }

    /// [`poll`](Self::poll), ending early with `Search cancelled` once
    /// `cancel` fires.
    pub async fn poll_with_cancel(
        &self,
        handle: &JobHandle,
        max_count: NonZeroU64,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        let started = Instant::now();
        let result = self.poll_results(handle, max_count, cancel).await;
        self.finish(handle.query(), result, started)
    }

    /// Submit then poll. Submission failures skip polling.
    pub async fn run(&self, request: &SearchRequest) -> SearchOutcome {
        self.run_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// [`run`](Self::run) with a cancellation token. A token that is already
    /// cancelled short-circuits before any request is made.
    pub async fn run_with_cancel(
        &self,
        request: &SearchRequest,
        cancel: &CancellationToken,
    ) -> SearchOutcome {
        let started = Instant::now();
        let result = if cancel.is_cancelled() {
            Err(SearchError::Cancelled)
        } else {
            match self.submit(request).await {
                Ok(handle) => self.poll_results(&handle, request.max_count, cancel).await,
                Err(e) => Err(e),
            }
        };
        self.finish(&request.query, result, started)
    }

    async fn poll_results(
        &self,
        handle: &JobHandle,
        max_count: NonZeroU64,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchRecord>, SearchError> {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return Err(SearchError::Cancelled);
            }

            self.metrics.record_poll_attempt();
            match fetch_results(self.transport.as_ref(), handle.sid(), max_count).await {
                Ok(response) if response.is_success() => {
                    match parse_results_page(&response.body) {
                        Ok(Some(rows)) => {
                            debug!(sid = %handle.sid(), attempt, rows = rows.len(), "Results available");
                            return Ok(rows);
                        }
                        Ok(None) => {
                            debug!(sid = %handle.sid(), attempt, "Results not ready");
                        }
                        Err(e) => return Err(SearchError::Decode(e.to_string())),
                    }
                }
                Ok(response) => {
                    debug!(
                        sid = %handle.sid(),
                        attempt,
                        status = response.status,
                        "Results not ready"
                    );
                }
                Err(e) if e.is_transport_fault() => match self.policy.on_transport_fault {
                    TransportFaultPolicy::AbsorbAndRetry => {
                        warn!(sid = %handle.sid(), attempt, error = %e, "Poll attempt failed, retrying");
                    }
                    TransportFaultPolicy::Abort => return Err(SearchError::Transport(e)),
                },
                Err(e) => return Err(SearchError::Transport(e)),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.policy.interval) => {}
                _ = cancel.cancelled() => return Err(SearchError::Cancelled),
            }
        }

        Err(SearchError::Timeout {
            attempts: max_attempts,
        })
    }

    fn finish(
        &self,
        query: &str,
        result: Result<Vec<SearchRecord>, SearchError>,
        started: Instant,
    ) -> SearchOutcome {
        let elapsed = started.elapsed();
        match result {
            Ok(results) => {
                info!(
                    query = %redact_query(query),
                    rows = results.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Search succeeded"
                );
                self.metrics
                    .record_search_outcome(SearchOutcomeLabel::Success, elapsed);
                SearchOutcome::Success {
                    results,
                    query: query.to_string(),
                }
            }
            Err(e) => {
                let label = e.outcome_label();
                info!(
                    query = %redact_query(query),
                    outcome = label.as_str(),
                    error = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Search failed"
                );
                self.metrics.record_search_outcome(label, elapsed);
                SearchOutcome::Failure {
                    error: e.to_string(),
                    query: query.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    fn orchestrator(transport: ScriptedTransport) -> SearchOrchestrator<ScriptedTransport> {
        SearchOrchestrator::new(Arc::new(transport), PollPolicy::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt_does_not_sleep() {
        let orch = orchestrator(
            ScriptedTransport::new()
                .then_sid("1")
                .then_results(json!([{"host": "web-1"}])),
        );
        let started = Instant::now();

        let outcome = orch.run(&SearchRequest::new("index=main")).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.count(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(orch.transport().poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_request_shape() {
        let orch = orchestrator(ScriptedTransport::new().then_sid("7").then_results(json!([])));
        let request = SearchRequest::new("index=_internal")
            .with_earliest_time("-15m")
            .with_max_count(NonZeroU64::new(10).unwrap());

        orch.run(&request).await;

        let requests = orch.transport().requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/services/search/jobs");
        assert_eq!(requests[0].param("search"), Some("search index=_internal"));
        assert_eq!(requests[0].param("earliest_time"), Some("-15m"));
        assert_eq!(requests[0].param("latest_time"), Some("now"));
        assert_eq!(requests[0].param("output_mode"), Some("json"));
        assert_eq!(requests[1].path, "/services/search/jobs/7/results");
        assert_eq!(requests[1].param("count"), Some("10"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_sid_fails_without_polling() {
        let orch = orchestrator(ScriptedTransport::new().then_respond(201, r#"{"messages": []}"#));

        let outcome = orch.run(&SearchRequest::new("index=main")).await;

        assert_eq!(outcome.error(), Some("Failed to extract job SID"));
        assert_eq!(outcome.query(), "index=main");
        assert_eq!(orch.transport().call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_fault_ends_loop() {
        let orch = orchestrator(
            ScriptedTransport::new()
                .then_sid("1")
                .then_respond(200, "<html>busy</html>"),
        );

        let outcome = orch.run(&SearchRequest::new("index=main")).await;

        assert!(
            outcome
                .error()
                .is_some_and(|e| e.starts_with("Failed to decode search results"))
        );
        assert_eq!(orch.transport().poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_cancelled_token_makes_no_requests() {
        let orch = orchestrator(ScriptedTransport::new());
        let token = CancellationToken::new();
        token.cancel();

        let outcome = orch
            .run_with_cancel(&SearchRequest::new("index=main"), &token)
            .await;

        assert_eq!(outcome.error(), Some("Search cancelled"));
        assert_eq!(orch.transport().call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_uses_handle_query() {
        let orch = orchestrator(ScriptedTransport::new().then_results(json!([])));
        let handle = JobHandle::new("9".to_string(), "index=os".to_string());

        let outcome = orch.poll(&handle, NonZeroU64::new(100).unwrap()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.query(), "index=os");
    }
}
