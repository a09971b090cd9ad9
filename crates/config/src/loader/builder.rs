//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` that merges `.env`, environment
//!   variables and explicit overrides.
//! - Assemble the base URL from `SPLUNK_HOST`/`SPLUNK_PORT`/`SPLUNK_SCHEME` when no
//!   full URL is given.
//! - Build and validate the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables.
//! - A full base URL takes precedence over host/port/scheme.
//! - An API token takes precedence over username/password.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{
    DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_POLL_MAX_ATTEMPTS,
    DEFAULT_SESSION_TTL_SECS, DEFAULT_SPLUNK_PORT, DEFAULT_SPLUNK_SCHEME, DEFAULT_TIMEOUT_SECS,
    MAX_POLL_INTERVAL_MS, MAX_POLL_MAX_ATTEMPTS, MAX_SESSION_TTL_SECS, MAX_TIMEOUT_SECS,
};
use crate::types::{
    AuthConfig, AuthStrategy, Config, ConnectionConfig, PollPolicy, TransportFaultPolicy,
};

/// Configuration loader that builds config from `.env`, environment variables and overrides.
#[derive(Default)]
pub struct ConfigLoader {
    base_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    scheme: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    session_expiry_buffer_seconds: Option<u64>,
    session_ttl_seconds: Option<u64>,
    poll_max_attempts: Option<u32>,
    poll_interval: Option<Duration>,
    poll_abort_on_transport_fault: Option<bool>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Loaded .env file");
                Ok(self)
            }
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the full base URL.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the host used when no full base URL is configured.
    pub fn with_host(mut self, host: String) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the management port used with `with_host`.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the URL scheme used with `with_host`.
    pub fn with_scheme(mut self, scheme: String) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the session TTL in seconds.
    pub fn with_session_ttl_seconds(mut self, ttl: u64) -> Self {
        self.session_ttl_seconds = Some(ttl);
        self
    }

    /// Set the maximum number of result polls per search.
    pub fn with_poll_max_attempts(mut self, attempts: u32) -> Self {
        self.poll_max_attempts = Some(attempts);
        self
    }

    /// Set the spacing between result polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// End a search as soon as one poll fails at the transport level.
    pub fn with_poll_abort_on_transport_fault(mut self, abort: bool) -> Self {
        self.poll_abort_on_transport_fault = Some(abort);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let base_url = self.resolve_base_url()?;

        // API token takes precedence
        let strategy = if let Some(token) = self.api_token {
            AuthStrategy::ApiToken { token }
        } else if let (Some(username), Some(password)) = (self.username, self.password) {
            AuthStrategy::SessionToken { username, password }
        } else {
            return Err(ConfigError::MissingAuth);
        };

        let connection = ConnectionConfig {
            base_url,
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            session_expiry_buffer_seconds: self
                .session_expiry_buffer_seconds
                .unwrap_or(DEFAULT_EXPIRY_BUFFER_SECS),
            session_ttl_seconds: self.session_ttl_seconds.unwrap_or(DEFAULT_SESSION_TTL_SECS),
        };
        validate_timeout_config(&connection)?;

        let on_transport_fault = if self.poll_abort_on_transport_fault.unwrap_or(false) {
            TransportFaultPolicy::Abort
        } else {
            TransportFaultPolicy::AbsorbAndRetry
        };
        let poll = PollPolicy {
            max_attempts: self.poll_max_attempts.unwrap_or(DEFAULT_POLL_MAX_ATTEMPTS),
            interval: self
                .poll_interval
                .unwrap_or(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)),
            on_transport_fault,
        };
        validate_poll_policy(&poll)?;

        Ok(Config {
            connection,
            auth: AuthConfig { strategy },
            poll,
        })
    }

    fn resolve_base_url(&self) -> Result<String, ConfigError> {
        if let Some(raw) = self.base_url.as_deref() {
            return validate_and_normalize_base_url(raw);
        }

        let host = self
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;
        let scheme = self.scheme.as_deref().unwrap_or(DEFAULT_SPLUNK_SCHEME);
        let port = self.port.unwrap_or(DEFAULT_SPLUNK_PORT);

        validate_and_normalize_base_url(&format!("{scheme}://{host}:{port}"))
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn set_base_url(&mut self, url: Option<String>) {
        self.base_url = url;
    }

    pub(crate) fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    pub(crate) fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    pub(crate) fn set_scheme(&mut self, scheme: Option<String>) {
        self.scheme = scheme;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_session_expiry_buffer_seconds(&mut self, buffer: Option<u64>) {
        self.session_expiry_buffer_seconds = buffer;
    }

    pub(crate) fn set_session_ttl_seconds(&mut self, ttl: Option<u64>) {
        self.session_ttl_seconds = ttl;
    }

    pub(crate) fn set_poll_max_attempts(&mut self, attempts: Option<u32>) {
        self.poll_max_attempts = attempts;
    }

    pub(crate) fn set_poll_interval(&mut self, interval: Option<Duration>) {
        self.poll_interval = interval;
    }

    pub(crate) fn set_poll_abort_on_transport_fault(&mut self, abort: Option<bool>) {
        self.poll_abort_on_transport_fault = abort;
    }
}

/// Validates timeout-related configuration values.
fn validate_timeout_config(connection: &ConnectionConfig) -> Result<(), ConfigError> {
    let timeout_secs = connection.timeout.as_secs();

    if timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout {
            message: "timeout must be greater than 0 seconds".to_string(),
        });
    }

    if timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout {
            message: format!(
                "timeout exceeds maximum allowed value of {} seconds",
                MAX_TIMEOUT_SECS
            ),
        });
    }

    if connection.session_ttl_seconds <= connection.session_expiry_buffer_seconds {
        return Err(ConfigError::InvalidSessionTtl {
            message: format!(
                "session_ttl_seconds ({}) must be greater than session_expiry_buffer_seconds ({})",
                connection.session_ttl_seconds, connection.session_expiry_buffer_seconds
            ),
        });
    }

    if connection.session_ttl_seconds > MAX_SESSION_TTL_SECS {
        return Err(ConfigError::InvalidSessionTtl {
            message: format!(
                "session_ttl_seconds exceeds maximum allowed value of {} seconds",
                MAX_SESSION_TTL_SECS
            ),
        });
    }

    Ok(())
}

fn validate_poll_policy(poll: &PollPolicy) -> Result<(), ConfigError> {
    if poll.max_attempts == 0 || poll.max_attempts > MAX_POLL_MAX_ATTEMPTS {
        return Err(ConfigError::InvalidPollPolicy {
            message: format!(
                "max attempts must be between 1 and {MAX_POLL_MAX_ATTEMPTS}, got {}",
                poll.max_attempts
            ),
        });
    }

    if poll.interval > Duration::from_millis(MAX_POLL_INTERVAL_MS) {
        return Err(ConfigError::InvalidPollPolicy {
            message: format!(
                "interval exceeds maximum allowed value of {MAX_POLL_INTERVAL_MS} ms"
            ),
        });
    }

    Ok(())
}

/// Validates and normalizes a base URL string.
///
/// Validation rules:
/// - Trim surrounding whitespace
/// - Treat blank/whitespace-only as missing (returns Err(ConfigError::MissingBaseUrl))
/// - Parse as an absolute URL
/// - Require scheme is http or https
/// - Require host is present
/// - Normalize by stripping trailing slash
fn validate_and_normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        message: format!("must be an absolute http(s) URL with a host: {e}"),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            message: "host is required".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn token_loader() -> ConfigLoader {
        ConfigLoader::new().with_api_token("tok".to_string())
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = token_loader()
            .with_base_url("  https://splunk.example.com:8089/  ".to_string())
            .build()
            .unwrap();
        assert_eq!(config.connection.base_url, "https://splunk.example.com:8089");
    }

    #[test]
    fn test_base_url_from_host_uses_default_port_and_scheme() {
        let config = token_loader()
            .with_host("splunk.internal".to_string())
            .build()
            .unwrap();
        assert_eq!(config.connection.base_url, "https://splunk.internal:8089");
    }

    #[test]
    fn test_base_url_from_host_port_scheme() {
        let config = token_loader()
            .with_host("10.0.0.5".to_string())
            .with_port(18089)
            .with_scheme("http".to_string())
            .build()
            .unwrap();
        assert_eq!(config.connection.base_url, "http://10.0.0.5:18089");
    }

    #[test]
    fn test_full_base_url_wins_over_host() {
        let config = token_loader()
            .with_base_url("https://primary:8089".to_string())
            .with_host("secondary".to_string())
            .build()
            .unwrap();
        assert_eq!(config.connection.base_url, "https://primary:8089");
    }

    #[test]
    fn test_missing_base_url() {
        let err = token_loader().build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl));

        let err = token_loader()
            .with_base_url("   ".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = token_loader()
            .with_base_url("ftp://splunk:8089".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_api_token_preferred_over_password() {
        let config = ConfigLoader::new()
            .with_base_url("https://localhost:8089".to_string())
            .with_username("admin".to_string())
            .with_password("changeme".to_string())
            .with_api_token("tok".to_string())
            .build()
            .unwrap();

        match config.auth.strategy {
            AuthStrategy::ApiToken { token } => assert_eq!(token.expose_secret(), "tok"),
            AuthStrategy::SessionToken { .. } => panic!("expected API token auth"),
        }
    }

    #[test]
    fn test_username_without_password_is_missing_auth() {
        let err = ConfigLoader::new()
            .with_base_url("https://localhost:8089".to_string())
            .with_username("admin".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingAuth));
    }

    #[test]
    fn test_timeout_bounds() {
        let err = token_loader()
            .with_base_url("https://localhost:8089".to_string())
            .with_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));

        let err = token_loader()
            .with_base_url("https://localhost:8089".to_string())
            .with_timeout(Duration::from_secs(MAX_TIMEOUT_SECS + 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }

    #[test]
    fn test_session_ttl_must_exceed_buffer() {
        let err = token_loader()
            .with_base_url("https://localhost:8089".to_string())
            .with_session_ttl_seconds(DEFAULT_EXPIRY_BUFFER_SECS)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSessionTtl { .. }));
    }

    #[test]
    fn test_poll_policy_defaults_and_overrides() {
        let config = token_loader()
            .with_base_url("https://localhost:8089".to_string())
            .build()
            .unwrap();
        assert_eq!(config.poll, PollPolicy::default());

        let config = token_loader()
            .with_base_url("https://localhost:8089".to_string())
            .with_poll_max_attempts(5)
            .with_poll_interval(Duration::from_millis(10))
            .with_poll_abort_on_transport_fault(true)
            .build()
            .unwrap();
        assert_eq!(config.poll.max_attempts, 5);
        assert_eq!(config.poll.interval, Duration::from_millis(10));
        assert_eq!(config.poll.on_transport_fault, TransportFaultPolicy::Abort);
    }

    #[test]
    fn test_poll_policy_bounds() {
        for attempts in [0, MAX_POLL_MAX_ATTEMPTS + 1] {
            let err = token_loader()
                .with_base_url("https://localhost:8089".to_string())
                .with_poll_max_attempts(attempts)
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPollPolicy { .. }));
        }

        let err = token_loader()
            .with_base_url("https://localhost:8089".to_string())
            .with_poll_interval(Duration::from_millis(MAX_POLL_INTERVAL_MS + 1))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPollPolicy { .. }));
    }

    #[test]
    fn test_zero_poll_interval_is_allowed() {
        let config = token_loader()
            .with_base_url("https://localhost:8089".to_string())
            .with_poll_interval(Duration::ZERO)
            .build()
            .unwrap();
        assert_eq!(config.poll.interval, Duration::ZERO);
    }
}
