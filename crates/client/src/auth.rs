//! Authentication strategies and session management.
//!
//! Responsibilities:
//! - Hold the credentials the transport authenticates with.
//! - Cache the session key obtained from `/services/auth/login` with a TTL.
//! - Render the `Authorization` header value for the active credential.
//!
//! Does NOT handle:
//! - The login request itself (see `endpoints::login`).
//! - Locking; the client keeps the manager behind an async mutex.

use secrecy::{ExposeSecret, SecretString};
use splunk_config::constants::DEFAULT_EXPIRY_BUFFER_SECS;
use std::time::{Duration, Instant};

/// Strategy for authenticating with Splunk.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Username and password, exchanged for a session key on first use.
    SessionToken {
        username: String,
        password: SecretString,
    },
    /// API token (bearer token authentication).
    ApiToken { token: SecretString },
}

/// Manages Splunk session keys with automatic renewal.
#[derive(Debug)]
pub struct SessionManager {
    auth_strategy: AuthStrategy,
    session_token: Option<SessionToken>,
}

#[derive(Debug, Clone)]
struct SessionToken {
    value: SecretString,
    expires_at: Option<Instant>,
    expiry_buffer: Duration,
}

impl SessionToken {
    fn new(
        value: SecretString,
        ttl_seconds: Option<u64>,
        expiry_buffer_seconds: Option<u64>,
    ) -> Self {
        Self {
            value,
            expires_at: ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl)),
            expiry_buffer: Duration::from_secs(
                expiry_buffer_seconds.unwrap_or(DEFAULT_EXPIRY_BUFFER_SECS),
            ),
        }
    }

    /// Expired, or close enough to expiry that it should be refreshed now.
    fn needs_refresh(&self) -> bool {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()) < self.expiry_buffer)
            .unwrap_or(false)
    }
}

impl SessionManager {
    /// Create a new session manager with the given auth strategy.
    pub fn new(strategy: AuthStrategy) -> Self {
        Self {
            auth_strategy: strategy,
            session_token: None,
        }
    }

    /// Get the current auth strategy.
    pub fn strategy(&self) -> &AuthStrategy {
        &self.auth_strategy
    }

    /// Check if we're using API token auth (no session management needed).
    pub fn is_api_token(&self) -> bool {
        matches!(self.auth_strategy, AuthStrategy::ApiToken { .. })
    }

    /// Username for session auth, if any.
    pub fn username(&self) -> Option<&str> {
        match &self.auth_strategy {
            AuthStrategy::SessionToken { username, .. } => Some(username),
            AuthStrategy::ApiToken { .. } => None,
        }
    }

    /// True when a login is required before the next request.
    ///
    /// Always false for API token auth.
    pub fn needs_login(&self) -> bool {
        if self.is_api_token() {
            return false;
        }
        self.session_token
            .as_ref()
            .map(SessionToken::needs_refresh)
            .unwrap_or(true)
    }

    /// Store the session key received from a login response.
    pub fn set_session_token(
        &mut self,
        token: String,
        ttl_seconds: Option<u64>,
        expiry_buffer_seconds: Option<u64>,
    ) {
        self.session_token = Some(SessionToken::new(
            SecretString::new(token.into()),
            ttl_seconds,
            expiry_buffer_seconds,
        ));
    }

    /// Clear the current session token (force re-authentication).
    pub fn clear_session(&mut self) {
        self.session_token = None;
    }

    /// Value for the `Authorization` header.
    ///
    /// API tokens use the `Bearer` scheme; session keys use Splunk's own
    /// `Splunk` scheme. `None` while a session login is outstanding.
    pub fn authorization_header(&self) -> Option<String> {
        match &self.auth_strategy {
            AuthStrategy::ApiToken { token } => Some(format!("Bearer {}", token.expose_secret())),
            AuthStrategy::SessionToken { .. } => self
                .session_token
                .as_ref()
                .map(|t| format!("Splunk {}", t.value.expose_secret())),
        }
    }
}
