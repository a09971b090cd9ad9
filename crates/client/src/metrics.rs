//! Metrics collection for Splunk API calls and search orchestration.
//!
//! This module provides metrics collection for:
//! - Request latency histograms and request/error counters per endpoint
//! - Result poll attempts
//! - Search outcomes (`success`, `failure`, `timeout`, `cancelled`)
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (see [`crate::metrics_exporter`])
//!
//! # Invariants
//! - All metrics use consistent label names: `endpoint`, `method`, `status`, `error_category`, `outcome`
//! - Endpoint labels never contain job ids or usernames (see [`endpoint_label`])
//! - Zero-cost when no metrics recorder is installed

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "splunk_api_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "splunk_api_requests_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "splunk_api_errors_total";

/// Metric name for result poll attempts.
pub const METRIC_POLL_ATTEMPTS_TOTAL: &str = "splunk_search_poll_attempts_total";

/// Metric name for finished searches, labelled by outcome.
pub const METRIC_SEARCH_OUTCOMES_TOTAL: &str = "splunk_search_outcomes_total";

/// Metric name for end-to-end search duration.
pub const METRIC_SEARCH_DURATION: &str = "splunk_search_duration_seconds";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport-level errors (connection refused, DNS, TLS, timeout)
    Transport,
    /// HTTP 4xx client errors
    Http4xx,
    /// HTTP 5xx server errors
    Http5xx,
    /// Authentication failures
    Auth,
    /// Unparseable response bodies
    Decode,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Decode => "decode",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::HttpError(_) | ClientError::TransportFault(_) => ErrorCategory::Transport,
            ClientError::AuthFailed(_) | ClientError::SessionExpired { .. } => ErrorCategory::Auth,
            ClientError::ApiError { status, .. } if (400..500).contains(status) => {
                ErrorCategory::Http4xx
            }
            ClientError::ApiError { status, .. } if (500..600).contains(status) => {
                ErrorCategory::Http5xx
            }
            ClientError::InvalidResponse(_) => ErrorCategory::Decode,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// How a search orchestration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcomeLabel {
    Success,
    Failure,
    Timeout,
    Cancelled,
}

impl SearchOutcomeLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Replace path segments that carry identifiers with placeholders.
pub fn endpoint_label(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("/services/search/jobs/") {
        return if rest.ends_with("/results") {
            "/services/search/jobs/{sid}/results".to_string()
        } else {
            "/services/search/jobs/{sid}".to_string()
        };
    }
    if path.starts_with("/services/authentication/users/") {
        return "/services/authentication/users/{name}".to_string();
    }
    path.to_string()
}

/// Metrics collector for Splunk API calls.
///
/// A thin wrapper around the `metrics` crate macros that keeps label names
/// consistent. The default collector is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled metrics collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a disabled metrics collector.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if metrics collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one request and its latency.
    ///
    /// `status` is `None` when the request failed before a response arrived.
    pub fn record_request(&self, path: &str, method: &str, duration: Duration, status: Option<u16>) {
        if !self.enabled {
            return;
        }

        let endpoint = endpoint_label(path);
        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.clone(),
            "method" => method.to_string(),
        )
        .increment(1);

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint,
            "method" => method.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record an error from a ClientError.
    pub fn record_client_error(&self, path: &str, method: &str, error: &ClientError) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint_label(path),
            "method" => method.to_string(),
            "error_category" => ErrorCategory::from(error).as_str(),
        )
        .increment(1);
    }

    /// Record one result poll attempt.
    pub fn record_poll_attempt(&self) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_POLL_ATTEMPTS_TOTAL).increment(1);
    }

    /// Record how a search ended and how long it took.
    pub fn record_search_outcome(&self, outcome: SearchOutcomeLabel, duration: Duration) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_SEARCH_OUTCOMES_TOTAL, "outcome" => outcome.as_str()).increment(1);
        metrics::histogram!(METRIC_SEARCH_DURATION, "outcome" => outcome.as_str())
            .record(duration.as_secs_f64());
    }
}
