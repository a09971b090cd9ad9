//! Construction of [`SplunkClient`].
//!
//! The builder wraps a [`ConnectionConfig`] plus the credentials. It is
//! usually seeded from a loaded [`Config`] and only tweaked in tests.
//!
//! # Invariants
//! - The stored base URL never ends with `/`, so `base + "/services/..."` is
//!   always a single-slash join.
//! - TLS verification stays on unless `skip_verify` is set for an `https` URL.
//! - Redirects are followed at most `DEFAULT_MAX_REDIRECTS` times.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::warn;

use crate::auth::{AuthStrategy, SessionManager};
use crate::client::SplunkClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use splunk_config::constants::DEFAULT_MAX_REDIRECTS;
use splunk_config::{AuthStrategy as ConfigAuthStrategy, Config, ConnectionConfig};

const USER_AGENT: &str = concat!("splunk-mcp/", env!("CARGO_PKG_VERSION"));

/// Builder for [`SplunkClient`].
///
/// ```rust,ignore
/// let client = SplunkClient::builder()
///     .from_config(&config)
///     .metrics(MetricsCollector::new())
///     .build()?;
/// ```
#[derive(Default)]
pub struct SplunkClientBuilder {
    connection: Option<ConnectionConfig>,
    auth: Option<AuthStrategy>,
    metrics: MetricsCollector,
}

impl SplunkClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn connection_mut(&mut self) -> Option<&mut ConnectionConfig> {
        self.connection.as_mut()
    }

    /// Target `url`, keeping any timeout or TLS settings already made.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        match self.connection_mut() {
            Some(connection) => connection.base_url = url,
            None => self.connection = Some(ConnectionConfig::new(url)),
        }
        self
    }

    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth = Some(strategy);
        self
    }

    /// Accept invalid certificates. Ignored for `http` URLs and for a builder
    /// without a base URL.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        if let Some(connection) = self.connection_mut() {
            connection.skip_verify = skip;
        }
        self
    }

    /// Per-request timeout. Ignored for a builder without a base URL.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        if let Some(connection) = self.connection_mut() {
            connection.timeout = timeout;
        }
        self
    }

    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    /// Take connection settings and credentials from `config`.
    pub fn from_config(mut self, config: &Config) -> Self {
        self.connection = Some(config.connection.clone());
        self.auth = Some(match &config.auth.strategy {
            ConfigAuthStrategy::ApiToken { token } => AuthStrategy::ApiToken {
                token: token.clone(),
            },
            ConfigAuthStrategy::SessionToken { username, password } => {
                AuthStrategy::SessionToken {
                    username: username.clone(),
                    password: password.clone(),
                }
            }
        });
        self
    }

    /// Create the client.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUrl`] without a base URL.
    /// - [`ClientError::AuthFailed`] without credentials.
    /// - [`ClientError::HttpError`] when reqwest rejects the TLS setup.
    pub fn build(self) -> Result<SplunkClient> {
        let connection = self
            .connection
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let auth = self
            .auth
            .ok_or_else(|| ClientError::AuthFailed("auth_strategy is required".to_string()))?;

        let base_url = connection.base_url.trim_end_matches('/').to_string();
        let http = http_client(&base_url, &connection)?;

        let session = SessionManager::new(auth);
        let api_token_auth = session.is_api_token();

        Ok(SplunkClient {
            http,
            base_url,
            session: Mutex::new(session),
            api_token_auth,
            session_ttl_seconds: connection.session_ttl_seconds,
            session_expiry_buffer_seconds: connection.session_expiry_buffer_seconds,
            metrics: self.metrics,
        })
    }
}

fn http_client(base_url: &str, connection: &ConnectionConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(connection.timeout)
        .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

    if connection.skip_verify {
        if base_url.starts_with("https://") {
            warn!(base_url, "TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        } else {
            warn!(base_url, "skip_verify has no effect on a plain HTTP URL");
        }
    }

    Ok(builder.build()?)
}
