//! Outgoing request interceptors

use super::error::ClientError;
use super::request::PendingRequest;
use backoffice_core::{TokenKind, TokenStore};
use std::sync::Arc;

/// Hook run on every outgoing request before it is dispatched
///
/// Interceptors run in registration order and are re-run when a request is
/// replayed after a token refresh, so they must read their inputs fresh.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &mut PendingRequest) -> Result<(), ClientError>;
}

/// Attaches the stored access token as a bearer credential
///
/// When no token is stored the request goes out unauthenticated; the server
/// decides whether that is acceptable.
pub struct BearerAuth {
    store: Arc<dyn TokenStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept(&self, request: &mut PendingRequest) -> Result<(), ClientError> {
        match self.store.get(TokenKind::Access) {
            Some(token) => request.set_bearer(&token),
            None => {
                request.clear_bearer();
                Ok(())
            }
        }
    }
}
