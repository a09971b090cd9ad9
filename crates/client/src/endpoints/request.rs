//! Response handling shared by all endpoint functions.
//!
//! Responsibilities:
//! - Turn a `reqwest::Response` into a [`TransportResponse`].
//! - Convert non-success statuses into `ClientError::ApiError`, preferring the
//!   Splunk `messages[]` text over the raw body.
//! - Decode JSON bodies into typed models.
//!
//! Does NOT handle:
//! - Retrying. Requests are sent once; the search poller owns its own loop.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::models::SplunkMessages;
use crate::transport::TransportResponse;

/// Header Splunk uses to correlate a request with its server-side logs.
const REQUEST_ID_HEADER: &str = "X-Splunk-Request-Id";

/// Read status, request id and body out of a response.
pub(crate) async fn read_response(response: Response) -> Result<TransportResponse> {
    let status = response.status().as_u16();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let body = response.text().await?;

    Ok(TransportResponse {
        status,
        body,
        request_id,
    })
}

/// Pass 2xx responses through; map everything else to `ApiError`.
pub fn ensure_success(response: TransportResponse, path: &str) -> Result<TransportResponse> {
    if response.is_success() {
        return Ok(response);
    }

    // Try to parse Splunk error messages for a cleaner display
    let message = match serde_json::from_str::<SplunkMessages>(&response.body) {
        Ok(m) if !m.messages.is_empty() => m.summary(),
        _ if response.body.trim().is_empty() => format!("HTTP {}", response.status),
        _ => response.body,
    };

    Err(ClientError::ApiError {
        status: response.status,
        url: path.to_string(),
        message,
        request_id: response.request_id,
    })
}

/// Decode a JSON body, reporting which endpoint produced the malformed payload.
pub fn decode_json<T: DeserializeOwned>(response: &TransportResponse, path: &str) -> Result<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        ClientError::InvalidResponse(format!("Failed to parse response from {path}: {e}"))
    })
}
