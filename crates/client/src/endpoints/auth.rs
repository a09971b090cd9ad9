//! Authentication endpoints.

use reqwest::Client;
use tracing::debug;

use crate::endpoints::request::{decode_json, ensure_success, read_response};
use crate::error::{ClientError, Result};

const LOGIN_PATH: &str = "/services/auth/login";

/// Login to Splunk with username and password, returning the session key.
pub async fn login(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    debug!("Logging in to Splunk as {}", username);

    let url = format!("{}{}", base_url, LOGIN_PATH);
    let response = client
        .post(&url)
        .form(&[("username", username), ("password", password)])
        .query(&[("output_mode", "json")])
        .send()
        .await?;
    let response = read_response(response).await?;

    let response = ensure_success(response, LOGIN_PATH).map_err(|e| match e {
        ClientError::ApiError {
            status: 401 | 403,
            message,
            ..
        } => ClientError::AuthFailed(message),
        other => other,
    })?;

    let body: serde_json::Value = decode_json(&response, LOGIN_PATH)?;
    body.get("sessionKey")
        .or_else(|| body["entry"][0]["content"].get("sessionKey"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ClientError::InvalidResponse("Missing sessionKey in response".to_string()))
}
