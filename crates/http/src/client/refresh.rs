//! Access token renewal after a 401
//!
//! At most one refresh call is in flight at any time. The first request that
//! needs a new access token starts the exchange; every request that hits a
//! 401 while it is running awaits the same shared future and gets the same
//! outcome.

use super::events::{AuthEvent, AuthEvents};
use super::request::{PendingRequest, Transport};
use crate::types::AccessTokenResponse;
use backoffice_core::{TokenKind, TokenStore};
use futures::FutureExt;
use futures::future::Shared;
use reqwest::Method;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Token exchange endpoint, relative to the API root
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

/// Why the session could not be renewed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    #[error("no refresh token is stored")]
    MissingRefreshToken,

    #[error("refresh rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("refresh request failed: {0}")]
    Network(String),

    #[error("refresh response was malformed: {0}")]
    MalformedResponse(String),

    #[error("could not store the new access token: {0}")]
    Storage(String),
}

/// Observable coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

type RefreshOutcome = Result<String, RefreshFailure>;

#[cfg(not(target_arch = "wasm32"))]
type RefreshFuture = futures::future::BoxFuture<'static, RefreshOutcome>;
#[cfg(target_arch = "wasm32")]
type RefreshFuture = futures::future::LocalBoxFuture<'static, RefreshOutcome>;

struct InFlight {
    generation: u64,
    future: Shared<RefreshFuture>,
}

#[derive(Default)]
struct Slot {
    next_generation: u64,
    current: Option<InFlight>,
}

/// What made the caller ask for a new token
#[derive(Debug, Clone, Copy)]
pub(crate) enum Trigger<'a> {
    /// The server answered 401 to a request sent with this bearer
    Rejected { sent_with: Option<&'a str> },
    /// Explicit refresh, no request involved
    Manual,
}

enum Join {
    /// The token was renewed after the rejected request went out
    Rotated(String),
    Wait(u64, Shared<RefreshFuture>),
}

pub(crate) struct RefreshCoordinator {
    transport: Transport,
    store: Arc<dyn TokenStore>,
    events: AuthEvents,
    slot: Mutex<Slot>,
}

impl RefreshCoordinator {
    pub(crate) fn new(transport: Transport, store: Arc<dyn TokenStore>, events: AuthEvents) -> Self {
        Self {
            transport,
            store,
            events,
            slot: Mutex::new(Slot::default()),
        }
    }

    pub(crate) fn state(&self) -> RefreshState {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.current.is_some() {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    /// Obtain a usable access token, refreshing at most once per cycle
    pub(crate) async fn renew(&self, trigger: Trigger<'_>) -> RefreshOutcome {
        let (generation, future) = match self.join(trigger) {
            Join::Rotated(token) => {
                debug!("Access token already rotated, skipping refresh");
                return Ok(token);
            }
            Join::Wait(generation, future) => (generation, future),
        };

        let outcome = future.await;

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot
            .current
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == generation)
        {
            slot.current = None;
        }

        outcome
    }

    fn join(&self, trigger: Trigger<'_>) -> Join {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        // A finished cycle whose waiters were all dropped is not reused
        if slot
            .current
            .as_ref()
            .is_some_and(|in_flight| in_flight.future.peek().is_some())
        {
            slot.current = None;
        }

        if let Some(in_flight) = &slot.current {
            debug!(generation = in_flight.generation, "Joining in-flight token refresh");
            return Join::Wait(in_flight.generation, in_flight.future.clone());
        }

        // The store is written before the slot is emptied, so a token that
        // differs from the rejected one here comes from a finished refresh.
        if let Trigger::Rejected { sent_with } = trigger {
            if let Some(current) = self.store.get(TokenKind::Access) {
                if sent_with != Some(current.as_str()) {
                    return Join::Rotated(current);
                }
            }
        }

        let generation = slot.next_generation;
        slot.next_generation += 1;

        let transport = self.transport.clone();
        let store = Arc::clone(&self.store);
        let events = self.events.clone();
        let task = async move { refresh_session(&transport, store.as_ref(), &events).await };

        #[cfg(not(target_arch = "wasm32"))]
        let future = task.boxed().shared();
        #[cfg(target_arch = "wasm32")]
        let future = task.boxed_local().shared();

        debug!(generation, "Starting token refresh");
        slot.current = Some(InFlight {
            generation,
            future: future.clone(),
        });
        Join::Wait(generation, future)
    }
}

/// Run one refresh cycle and apply its side effects exactly once
async fn refresh_session(
    transport: &Transport,
    store: &dyn TokenStore,
    events: &AuthEvents,
) -> RefreshOutcome {
    match exchange(transport, store).await {
        Ok(access) => {
            info!("Access token refreshed");
            events.emit(AuthEvent::TokenRefreshed);
            Ok(access)
        }
        Err(failure) => {
            warn!(error = %failure, "Token refresh failed, ending session");
            if let Err(e) = store.clear() {
                error!("Failed to clear tokens after refresh failure: {e}");
            }
            events.emit(AuthEvent::SessionExpired {
                reason: failure.clone(),
            });
            Err(failure)
        }
    }
}

/// Trade the refresh token for a new access token
///
/// Goes straight to the transport: the expired bearer must not be attached.
async fn exchange(transport: &Transport, store: &dyn TokenStore) -> RefreshOutcome {
    let refresh = store
        .get(TokenKind::Refresh)
        .ok_or(RefreshFailure::MissingRefreshToken)?;

    let request = PendingRequest::new(Method::POST, REFRESH_PATH)
        .with_body(Some(serde_json::json!({ "refresh": refresh })));

    let response = transport
        .send(&request)
        .await
        .map_err(|e| RefreshFailure::Network(e.to_string()))?;

    if !response.is_success() {
        let status = response.status().as_u16();
        let message = match response.error_for_status() {
            Err(e) => e.to_string(),
            Ok(_) => String::new(),
        };
        return Err(RefreshFailure::Rejected { status, message });
    }

    let body: AccessTokenResponse = response
        .json()
        .map_err(|e| RefreshFailure::MalformedResponse(e.to_string()))?;
    if body.access.is_empty() {
        return Err(RefreshFailure::MalformedResponse(
            "empty access token".to_string(),
        ));
    }

    store
        .set(TokenKind::Access, &body.access)
        .map_err(|e| RefreshFailure::Storage(e.to_string()))?;

    Ok(body.access)
}
