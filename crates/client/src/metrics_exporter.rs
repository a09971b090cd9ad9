//! Prometheus exposition of the metrics recorded by [`crate::metrics`].
//!
//! `install` makes `metrics-exporter-prometheus` the global recorder, serves
//! `/metrics` on the given address and registers a description for every
//! metric this crate emits.

use std::net::{AddrParseError, SocketAddr};

use metrics::{Unit, describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use thiserror::Error;
use tracing::info;

use crate::metrics::{
    METRIC_ERRORS_TOTAL, METRIC_POLL_ATTEMPTS_TOTAL, METRIC_REQUEST_DURATION,
    METRIC_REQUESTS_TOTAL, METRIC_SEARCH_DURATION, METRIC_SEARCH_OUTCOMES_TOTAL,
};

/// Single REST calls: a few milliseconds up to the request timeout.
const REQUEST_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Whole searches: one poll interval up to well past the default 30 s budget.
const SEARCH_BUCKETS: &[f64] = &[0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 60.0, 120.0];

/// Handle to the installed exporter.
#[derive(Debug)]
pub struct MetricsExporter {
    bind_addr: SocketAddr,
}

impl MetricsExporter {
    /// Install the exporter and start its HTTP listener.
    ///
    /// Must run inside a Tokio runtime, which hosts the listener.
    ///
    /// # Errors
    ///
    /// Fails on an unparsable address, when another recorder is already
    /// installed, or when the listener cannot be started.
    pub fn install(bind_addr: &str) -> Result<Self, MetricsExporterError> {
        let addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| MetricsExporterError::InvalidBindAddress(bind_addr.to_string(), e))?;

        PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
                REQUEST_BUCKETS,
            )?
            .set_buckets_for_metric(
                Matcher::Full(METRIC_SEARCH_DURATION.to_string()),
                SEARCH_BUCKETS,
            )?
            .with_http_listener(addr)
            .install()?;

        describe();
        info!(%addr, "Serving Prometheus metrics at /metrics");

        Ok(Self { bind_addr: addr })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn describe() {
    describe_histogram!(
        METRIC_REQUEST_DURATION,
        Unit::Seconds,
        "Latency of Splunk REST requests by endpoint"
    );
    describe_counter!(METRIC_REQUESTS_TOTAL, "Splunk REST requests by endpoint and status");
    describe_counter!(METRIC_ERRORS_TOTAL, "Failed Splunk REST requests by error category");
    describe_counter!(METRIC_POLL_ATTEMPTS_TOTAL, "Search result polls");
    describe_counter!(METRIC_SEARCH_OUTCOMES_TOTAL, "Finished searches by outcome");
    describe_histogram!(
        METRIC_SEARCH_DURATION,
        Unit::Seconds,
        "Time from job submission to final outcome"
    );
}

#[derive(Debug, Error)]
pub enum MetricsExporterError {
    #[error("Invalid bind address '{0}': {1}")]
    InvalidBindAddress(String, AddrParseError),

    #[error("A metrics recorder is already installed")]
    RecorderAlreadyInstalled,

    #[error("Failed to build Prometheus recorder: {0}")]
    BuildError(String),
}

impl From<BuildError> for MetricsExporterError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::FailedToSetGlobalRecorder(_) => Self::RecorderAlreadyInstalled,
            other => Self::BuildError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bind_address() {
        let err = MetricsExporter::install("localhost-ish").unwrap_err();
        assert!(matches!(err, MetricsExporterError::InvalidBindAddress(_, _)));
        assert!(err.to_string().starts_with("Invalid bind address 'localhost-ish'"));
    }

    #[test]
    fn test_buckets_are_sorted() {
        for buckets in [REQUEST_BUCKETS, SEARCH_BUCKETS] {
            assert!(buckets.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
