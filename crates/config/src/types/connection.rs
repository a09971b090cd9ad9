//! Connection configuration types for Splunk.
//!
//! Responsibilities:
//! - Define connection settings (URL, TLS verification, timeouts, session lifetime).
//! - Define the main `Config` structure combining connection, auth and polling.
//! - Provide convenience constructors for common config patterns.
//!
//! Does NOT handle:
//! - Configuration loading from files/env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - TLS certificate verification is enabled unless explicitly disabled.
//! - Default values come from `constants`, not magic numbers.

use crate::constants::{
    DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_SESSION_TTL_SECS, DEFAULT_TIMEOUT_SECS,
};
use crate::types::auth::{AuthConfig, AuthStrategy};
use crate::types::poll::PollPolicy;
use secrecy::SecretString;
use std::time::Duration;

/// Connection configuration for a Splunk management endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of the Splunk server (e.g., https://localhost:8089)
    pub base_url: String,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Session time-to-live in seconds (how long session keys remain valid)
    pub session_ttl_seconds: u64,
    /// Buffer time before session expiry to proactively refresh the session key
    pub session_expiry_buffer_seconds: u64,
}

impl ConnectionConfig {
    /// Connection settings with defaults for everything but the URL.
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECS,
            session_expiry_buffer_seconds: DEFAULT_EXPIRY_BUFFER_SECS,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Search job result polling
    pub poll: PollPolicy,
}

impl Config {
    /// Create a new config with the specified base URL and API token.
    pub fn with_api_token(base_url: String, token: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: AuthStrategy::ApiToken { token },
            },
            poll: PollPolicy::default(),
        }
    }

    /// Create a new config with the specified base URL and username/password.
    pub fn with_session_token(base_url: String, username: String, password: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: AuthStrategy::SessionToken { username, password },
            },
            poll: PollPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_api_token_defaults() {
        let config = Config::with_api_token(
            "https://splunk.example.com:8089".to_string(),
            SecretString::new("token".to_string().into()),
        );

        assert_eq!(config.connection.base_url, "https://splunk.example.com:8089");
        assert!(!config.connection.skip_verify);
        assert_eq!(config.connection.timeout, Duration::from_secs(30));
        assert_eq!(config.poll, PollPolicy::default());
        assert!(matches!(
            config.auth.strategy,
            AuthStrategy::ApiToken { .. }
        ));
    }

    #[test]
    fn test_with_session_token_keeps_username() {
        let config = Config::with_session_token(
            "https://localhost:8089".to_string(),
            "admin".to_string(),
            SecretString::new("changeme".to_string().into()),
        );

        match config.auth.strategy {
            AuthStrategy::SessionToken { username, .. } => assert_eq!(username, "admin"),
            AuthStrategy::ApiToken { .. } => panic!("expected session auth"),
        }
        assert_eq!(config.connection.session_ttl_seconds, 3600);
        assert_eq!(config.connection.session_expiry_buffer_seconds, 60);
    }
}
