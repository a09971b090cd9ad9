//! Testing utilities for Splunk client tests.
//!
//! Provides [`ScriptedTransport`], an in-memory [`Transport`] that replays a
//! fixed sequence of responses and records every request it receives.
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use splunk_client::testing::ScriptedTransport;
//!
//! let transport = ScriptedTransport::new()
//!     .then_sid("1700000000.1")
//!     .then_not_ready()
//!     .then_results(serde_json::json!([{"count": "3"}]));
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{ClientError, Result};
use crate::transport::{Transport, TransportResponse};

/// One request seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of the first parameter named `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
enum Step {
    Respond(TransportResponse),
    Fault(String),
}

impl Step {
    fn materialize(&self) -> Result<TransportResponse> {
        match self {
            Step::Respond(response) => Ok(response.clone()),
            Step::Fault(message) => Err(ClientError::TransportFault(message.clone())),
        }
    }
}

/// Transport stub answering requests from a script, in order.
///
/// Requests are answered regardless of method or path. Once the script is
/// exhausted the fallback step is repeated; without a fallback the stub
/// answers with a transport fault.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    fallback: Option<Step>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next request with `status` and `body`.
    pub fn then_respond(mut self, status: u16, body: impl Into<String>) -> Self {
        self.push(Step::Respond(TransportResponse::new(status, body)));
        self
    }

    /// Answer the next request with a transport fault.
    pub fn then_fault(mut self, message: impl Into<String>) -> Self {
        self.push(Step::Fault(message.into()));
        self
    }

    /// Job-creation response carrying `sid`.
    pub fn then_sid(self, sid: &str) -> Self {
        let body = serde_json::json!({ "sid": sid }).to_string();
        self.then_respond(201, body)
    }

    /// Results response from a job that is still running.
    pub fn then_not_ready(self) -> Self {
        self.then_respond(200, r#"{"preview": true, "init_offset": 0, "messages": []}"#)
    }

    /// Results response carrying `rows`.
    pub fn then_results(self, rows: serde_json::Value) -> Self {
        let body = serde_json::json!({ "preview": false, "results": rows }).to_string();
        self.then_respond(200, body)
    }

    /// Repeat `not ready` responses `times` times.
    pub fn then_not_ready_times(mut self, times: usize) -> Self {
        for _ in 0..times {
            self = self.then_not_ready();
        }
        self
    }

    /// Answer every request past the end of the script with `status`/`body`.
    pub fn otherwise(mut self, status: u16, body: impl Into<String>) -> Self {
        self.fallback = Some(Step::Respond(TransportResponse::new(status, body)));
        self
    }

    /// Total number of requests received.
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Snapshot of every request received, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock_requests().clone()
    }

    /// Number of results requests received.
    pub fn poll_count(&self) -> usize {
        self.lock_requests()
            .iter()
            .filter(|r| r.method == "GET" && r.path.ends_with("/results"))
            .count()
    }

    fn push(&mut self, step: Step) {
        self.script
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(step);
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<RecordedRequest>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn answer(
        &self,
        method: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<TransportResponse> {
        self.lock_requests().push(RecordedRequest {
            method,
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        });

        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match next.as_ref().or(self.fallback.as_ref()) {
            Some(step) => step.materialize(),
            None => Err(ClientError::TransportFault(format!(
                "no scripted response for {method} {path}"
            ))),
        }
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<TransportResponse> {
        self.answer("GET", path, query)
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<TransportResponse> {
        self.answer("POST", path, form)
    }
}
