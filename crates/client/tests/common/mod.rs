//! Common test utilities for integration tests.
//!
//! Shared helpers for building clients against a wiremock server and for
//! canned Splunk response bodies.
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)
//! - Test-specific assertions or test logic

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use splunk_client::{AuthStrategy, SplunkClient, SplunkService};
use splunk_config::{PollPolicy, TransportFaultPolicy};

// Re-export commonly used types for test convenience
#[allow(unused_imports)]
pub use splunk_client::testing::ScriptedTransport;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client authenticating with the API token `test-token`.
#[allow(dead_code)]
pub fn api_token_client(server: &MockServer) -> SplunkClient {
    SplunkClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::ApiToken {
            token: SecretString::new("test-token".to_string().into()),
        })
        .build()
        .unwrap()
}

/// Client authenticating as `admin` / `testpassword`.
#[allow(dead_code)]
pub fn session_client(server: &MockServer) -> SplunkClient {
    SplunkClient::builder()
        .base_url(server.uri())
        .auth_strategy(AuthStrategy::SessionToken {
            username: "admin".to_string(),
            password: SecretString::new("testpassword".to_string().into()),
        })
        .build()
        .unwrap()
}

/// Poll policy without sleeps, for wire-level tests.
#[allow(dead_code)]
pub fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        max_attempts,
        interval: Duration::ZERO,
        on_transport_fault: TransportFaultPolicy::AbsorbAndRetry,
    }
}

/// Service over an API-token client with a fast poll policy.
#[allow(dead_code)]
pub fn http_service(server: &MockServer, max_attempts: u32) -> SplunkService<SplunkClient> {
    SplunkService::new(Arc::new(api_token_client(server)), fast_policy(max_attempts))
}

/// Job-creation response body.
#[allow(dead_code)]
pub fn sid_body(sid: &str) -> serde_json::Value {
    serde_json::json!({ "sid": sid })
}

/// Completed results body.
#[allow(dead_code)]
pub fn results_body(rows: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "preview": false,
        "init_offset": 0,
        "messages": [],
        "fields": [],
        "results": rows
    })
}

/// Body of a results request against a job that is still running.
#[allow(dead_code)]
pub fn running_body() -> serde_json::Value {
    serde_json::json!({ "preview": true, "init_offset": 0, "messages": [] })
}

/// Successful login body.
#[allow(dead_code)]
pub fn login_body(session_key: &str) -> serde_json::Value {
    serde_json::json!({ "sessionKey": session_key })
}

/// Advance Tokio's paused clock and yield so sleepers can observe the change.
#[allow(dead_code)]
pub async fn advance_and_yield(duration: Duration) {
    tokio::time::advance(duration).await;
    tokio::task::yield_now().await;
}

/// Assert that a task has not completed after yielding to the scheduler.
#[allow(dead_code)]
pub async fn assert_pending<T>(handle: &tokio::task::JoinHandle<T>, context: &str) {
    tokio::task::yield_now().await;
    assert!(!handle.is_finished(), "Expected pending task: {}", context);
}
