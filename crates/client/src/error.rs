//! Error types for the Splunk client.
//!
//! `ClientError` covers everything below the search orchestration: transport
//! faults, non-success API responses, authentication and malformed bodies.
//! The orchestration layer has its own taxonomy in [`crate::search::SearchError`].

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during Splunk client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP request error (connection, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API error response from Splunk.
    #[error("API error ({status}) at {url}: {message}{}", .request_id.as_ref().map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        request_id: Option<String>,
    },

    /// Session expired and could not be renewed.
    #[error("Session expired for user '{username}', please re-authenticate")]
    SessionExpired { username: String },

    /// Invalid response format from Splunk.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Transport-level failure not backed by a reqwest error.
    #[error("Transport fault: {0}")]
    TransportFault(String),
}

impl ClientError {
    /// Check if this error happened below the HTTP layer
    /// (connection refused, TLS, request timeout).
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::TransportFault(_))
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::AuthFailed(_) | Self::SessionExpired { .. } => true,
            Self::ApiError { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_auth_error() {
        let err = ClientError::AuthFailed("test".to_string());
        assert!(err.is_auth_error());

        let err = ClientError::SessionExpired {
            username: "admin".to_string(),
        };
        assert!(err.is_auth_error());

        let err = ClientError::ApiError {
            status: 401,
            url: "/services/data/indexes".to_string(),
            message: "Unauthorized".to_string(),
            request_id: None,
        };
        assert!(err.is_auth_error());

        let err = ClientError::InvalidResponse("bad".to_string());
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_api_error_display_includes_request_id() {
        let err = ClientError::ApiError {
            status: 500,
            url: "/services/search/jobs".to_string(),
            message: "ERROR: boom".to_string(),
            request_id: Some("abc123".to_string()),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("(500)"));
        assert!(rendered.contains("[Request ID: abc123]"));
    }

    #[test]
    fn test_transport_fault_classification() {
        assert!(ClientError::TransportFault("connection reset".to_string()).is_transport_fault());
        assert!(!ClientError::InvalidResponse("x".to_string()).is_transport_fault());
    }
}
