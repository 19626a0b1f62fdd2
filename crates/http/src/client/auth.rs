//! Session endpoints: login, manual refresh, logout

use super::error::ClientError;
use super::events::AuthEvent;
use super::refresh::Trigger;
use super::{ApiClient, PendingRequest};
use crate::types::Credentials;
use backoffice_core::{TokenKind, TokenPair};
use reqwest::Method;
use tracing::info;

/// Login endpoint, relative to the API root
pub const LOGIN_PATH: &str = "/auth/token/";

impl ApiClient {
    /// Exchange credentials for a token pair and store it
    ///
    /// Sent without interceptors and without 401 recovery: a stale bearer
    /// must not be attached, and wrong credentials must surface as
    /// [`ClientError::Unauthorized`] rather than end a session.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ClientError> {
        let request = PendingRequest::new(Method::POST, LOGIN_PATH).json(credentials)?;
        let pair: TokenPair = self
            .inner
            .transport
            .send(&request)
            .await?
            .error_for_status()?
            .json()?;

        self.inner.store.store_pair(&pair)?;
        self.inner.events.emit(AuthEvent::LoggedIn);
        info!(username = %credentials.username, "Logged in");
        Ok(pair)
    }

    /// Renew the access token now, joining any refresh already running
    ///
    /// On failure the tokens are cleared and a session-expired event is
    /// published, exactly as when a request hits a 401.
    pub async fn refresh_access_token(&self) -> Result<String, ClientError> {
        self.inner
            .refresh
            .renew(Trigger::Manual)
            .await
            .map_err(ClientError::AuthRefreshFailed)
    }

    /// Forget the session locally
    pub fn logout(&self) -> Result<(), ClientError> {
        self.inner.store.clear()?;
        self.inner.events.emit(AuthEvent::LoggedOut);
        info!("Logged out");
        Ok(())
    }

    /// Whether an access token is currently stored
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.is_authenticated()
    }

    /// Whether a refresh token is currently stored
    pub fn has_refresh_token(&self) -> bool {
        self.inner.store.get(TokenKind::Refresh).is_some()
    }
}
