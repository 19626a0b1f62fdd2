//! Authentication lifecycle events
//!
//! The client never navigates. It publishes what happened to the session and
//! the navigation layer decides what to do about it.

use super::refresh::RefreshFailure;
use tokio::sync::broadcast;
use tracing::trace;

/// Default buffer for subscribers that fall behind
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Something that changed the authentication state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A token pair was obtained by logging in
    LoggedIn,
    /// The access token was renewed with the refresh token
    TokenRefreshed,
    /// Tokens were cleared on request
    LoggedOut,
    /// Renewal failed; tokens were cleared and the user must log in again
    SessionExpired { reason: RefreshFailure },
}

/// Broadcast channel for [`AuthEvent`]s
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns how many subscribers will see it
    pub fn emit(&self, event: AuthEvent) -> usize {
        trace!(?event, "Publishing auth event");
        // No subscribers is not an error: nothing is listening yet.
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers() {
        let events = AuthEvents::default();
        assert_eq!(events.emit(AuthEvent::LoggedOut), 0);
    }

    #[test]
    fn test_subscribers_receive_events_in_order() {
        let events = AuthEvents::default();
        let mut rx = events.subscribe();

        events.emit(AuthEvent::LoggedIn);
        events.emit(AuthEvent::SessionExpired {
            reason: RefreshFailure::MissingRefreshToken,
        });

        assert_eq!(rx.try_recv().unwrap(), AuthEvent::LoggedIn);
        assert!(matches!(
            rx.try_recv().unwrap(),
            AuthEvent::SessionExpired { .. }
        ));
        assert!(rx.try_recv().is_err());
    }
}
