//! The request/response seam the search orchestration is generic over.
//!
//! Responsibilities:
//! - Define the two request shapes the Splunk tools need (GET with query
//!   parameters, POST with a form body) and the raw response they produce.
//!
//! Does NOT handle:
//! - Interpreting status codes. A non-success status is still `Ok`; only faults
//!   below the HTTP layer (connection, TLS, timeout) are `Err`.
//! - Authentication. Implementations attach credentials themselves.
//!
//! Invariants:
//! - Paths are relative to the management base URL and start with `/services/`.
//! - Implementations must be safe to share across concurrently running tasks.

use std::future::Future;

use crate::error::Result;

/// Status and body of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
    /// Value of the `X-Splunk-Request-Id` header, when present.
    pub request_id: Option<String>,
}

impl TransportResponse {
    /// Response without a request id.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            request_id: None,
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Authenticated access to the Splunk management endpoint.
pub trait Transport: Send + Sync {
    /// Issue a GET against `path` with the given query parameters.
    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<TransportResponse>> + Send;

    /// Issue a POST against `path` with a form-encoded body.
    fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}
