//! Authenticated HTTP access to the Splunk management API.
//!
//! [`SplunkClient`] is the production [`Transport`]: it prefixes paths with
//! the base URL, attaches the `Authorization` header, propagates trace
//! context and records request metrics.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `session`: Session key acquisition and invalidation (private module)
//!
//! # What this module does NOT handle:
//! - Interpreting responses (delegated to [`crate::endpoints`])
//! - Polling and result normalization (delegated to [`crate::search`])
//!
//! # Invariants
//! - Non-success statuses are returned as `Ok`; only faults below HTTP are `Err`.
//! - A 401 under session auth clears the session, logs in again and resends
//!   the request once. API token auth never retries.
//! - The client is `Send + Sync` and is shared between concurrent tool calls.

pub mod builder;
mod session;

use std::time::Instant;

use reqwest::header::AUTHORIZATION;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::SessionManager;
use crate::endpoints::request::read_response;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::tracing::inject_trace_context;
use crate::transport::{Transport, TransportResponse};

pub use builder::SplunkClientBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    PostForm,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::PostForm => "POST",
        }
    }
}

/// Splunk REST API client.
#[derive(Debug)]
pub struct SplunkClient {
    http: reqwest::Client,
    base_url: String,
    session: Mutex<SessionManager>,
    api_token_auth: bool,
    session_ttl_seconds: u64,
    session_expiry_buffer_seconds: u64,
    metrics: MetricsCollector,
}

impl SplunkClient {
    /// Create a new client builder.
    pub fn builder() -> SplunkClientBuilder {
        SplunkClientBuilder::new()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the client is using API token authentication.
    pub fn is_api_token_auth(&self) -> bool {
        self.api_token_auth
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<TransportResponse> {
        let auth = self.authorization_header().await?;
        let response = self.send_once(method, path, params, &auth).await?;

        if response.status == 401 && !self.api_token_auth {
            debug!("Session rejected (status 401), re-authenticating and retrying once");
            self.invalidate_session(&auth).await;
            let auth = self.authorization_header().await?;
            return self.send_once(method, path, params, &auth).await;
        }

        Ok(response)
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        auth: &str,
    ) -> Result<TransportResponse> {
        let url = format!("{}{}", self.base_url, path);
        let builder = match method {
            Method::Get => self.http.get(&url).query(params),
            Method::PostForm => self.http.post(&url).form(params),
        };
        let builder = inject_trace_context(builder.header(AUTHORIZATION, auth));

        let start = Instant::now();
        let result = match builder.send().await {
            Ok(response) => read_response(response).await,
            Err(e) => Err(e.into()),
        };
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => {
                debug!(
                    method = method.as_str(),
                    path,
                    status = response.status,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Splunk request completed"
                );
                self.metrics
                    .record_request(path, method.as_str(), elapsed, Some(response.status));
            }
            Err(e) => {
                debug!(method = method.as_str(), path, error = %e, "Splunk request failed");
                self.metrics
                    .record_request(path, method.as_str(), elapsed, None);
                self.metrics.record_client_error(path, method.as_str(), e);
            }
        }

        result
    }
}

impl Transport for SplunkClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<TransportResponse> {
        self.execute(Method::Get, path, query).await
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<TransportResponse> {
        self.execute(Method::PostForm, path, form).await
    }
}
