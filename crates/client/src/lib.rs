//! Splunk REST API client and search orchestration.
//!
//! This crate talks to the Splunk management API on behalf of the tool
//! server. It runs ad-hoc searches through Splunk's job protocol (submit,
//! poll, normalize), reads knowledge objects, and lists indexes and users.
//! Every tool operation answers with a success/failure envelope instead of
//! an error.
//!
//! The orchestration is generic over [`Transport`]; [`SplunkClient`] is the
//! HTTP implementation and [`testing::ScriptedTransport`] a scripted stub.

mod auth;
pub mod cancellation;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod knowledge;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
pub mod search;
mod serde_helpers;
pub mod service;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod tracing;
pub mod transport;

pub use auth::{AuthStrategy, SessionManager};
pub use cancellation::CancellationToken;
pub use client::{SplunkClient, SplunkClientBuilder};
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    IndexListResult, KnowledgeObjectRecord, KnowledgeObjectType, ObjectListResult, SearchRecord,
    UnsupportedType, UserInfoResult, UserListResult,
};
pub use search::{
    IndexedOutcome, JobHandle, SearchError, SearchOrchestrator, SearchOutcome, SearchRequest,
};
pub use service::SplunkService;
pub use transport::{Transport, TransportResponse};
