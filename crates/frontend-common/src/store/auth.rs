//! Session state: login and logout

use backoffice_core::TokenPair;
use backoffice_http::{ApiClient, AuthEvent, ClientError, Credentials};

/// Authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Username of the last successful login
    pub user: Option<String>,
}

/// Authentication state changes
pub enum AuthAction {
    SetUser(Option<String>),
}

impl AuthState {
    pub fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::SetUser(user) => self.user = user,
        }
    }
}

/// Login/logout actions
///
/// Whether a session exists is always read from the Token Store.
pub struct AuthModule {
    client: ApiClient,
    state: AuthState,
}

impl AuthModule {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: AuthState::default(),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Log in and store both tokens; errors go back to the caller
    pub async fn login(&mut self, credentials: &Credentials) -> Result<TokenPair, ClientError> {
        let pair = self.client.login(credentials).await?;
        self.state
            .reduce(AuthAction::SetUser(Some(credentials.username.clone())));
        Ok(pair)
    }

    /// Clear tokens and the user
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.state.reduce(AuthAction::SetUser(None));
        self.client.logout()
    }

    /// Forget the user once the session has ended elsewhere
    pub fn handle_event(&mut self, event: &AuthEvent) {
        if matches!(
            event,
            AuthEvent::LoggedOut | AuthEvent::SessionExpired { .. }
        ) {
            self.state.reduce(AuthAction::SetUser(None));
        }
    }
}
