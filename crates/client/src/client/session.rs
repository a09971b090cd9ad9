//! Client-level session management helpers.
//!
//! These methods lock the [`SessionManager`] and perform the login request
//! while holding the lock, so concurrent requests that find no valid session
//! trigger a single login between them.
//!
//! # What this module does NOT handle:
//! - Session key storage and expiry tracking (handled by [`SessionManager`] in `auth.rs`)
//! - The login HTTP exchange (handled by `endpoints::login`)
//!
//! # Invariants
//! - API token authentication never triggers login.
//! - A rejected session is only cleared if it is still the current one.

use secrecy::ExposeSecret;

use crate::auth::{AuthStrategy, SessionManager};
use crate::client::SplunkClient;
use crate::endpoints;
use crate::error::{ClientError, Result};

impl SplunkClient {
    /// `Authorization` header value, logging in first if the session is
    /// missing or about to expire.
    pub(crate) async fn authorization_header(&self) -> Result<String> {
        let mut session = self.session.lock().await;
        if session.needs_login() {
            self.login_locked(&mut session).await?;
        }

        session.authorization_header().ok_or_else(|| ClientError::SessionExpired {
            username: session.username().unwrap_or("api-token").to_string(),
        })
    }

    /// Drop the session whose header the server just rejected.
    pub(crate) async fn invalidate_session(&self, rejected: &str) {
        let mut session = self.session.lock().await;
        if session.authorization_header().as_deref() == Some(rejected) {
            session.clear_session();
        }
    }

    /// Login with username/password and cache the session key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthFailed`] for API token auth or rejected
    /// credentials.
    pub async fn login(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        self.login_locked(&mut session).await
    }

    async fn login_locked(&self, session: &mut SessionManager) -> Result<()> {
        let (username, password) = match session.strategy() {
            AuthStrategy::SessionToken { username, password } => {
                (username.clone(), password.clone())
            }
            AuthStrategy::ApiToken { .. } => {
                return Err(ClientError::AuthFailed(
                    "Cannot login with API token auth strategy".to_string(),
                ));
            }
        };

        let token = endpoints::login(
            &self.http,
            &self.base_url,
            &username,
            password.expose_secret(),
        )
        .await?;

        session.set_session_token(
            token,
            Some(self.session_ttl_seconds),
            Some(self.session_expiry_buffer_seconds),
        );
        Ok(())
    }
}
