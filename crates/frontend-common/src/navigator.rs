//! Navigation state driven by the guard and by auth events

use crate::router::{Route, RouteGuard, UnknownRoute};
use backoffice_http::AuthEvent;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, info, warn};

/// Why a navigation happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCause {
    /// Requested by the user
    User,
    /// A login or logout moved the user off a view they no longer belong on
    SessionChange,
    /// The refresh token was rejected
    SessionExpired,
}

/// One entry of the navigation history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: Route,
    pub landed: Route,
    pub cause: NavigationCause,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.requested != self.landed
    }
}

#[derive(Default)]
struct NavState {
    current: Option<Route>,
    history: Vec<Navigation>,
}

/// Current view plus its history
///
/// Every navigation passes through the [`RouteGuard`]. Session expiry
/// published by the client forces the login view.
pub struct Navigator {
    guard: RouteGuard,
    state: Mutex<NavState>,
}

impl Navigator {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            state: Mutex::new(NavState::default()),
        }
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn current(&self) -> Option<Route> {
        self.lock().current
    }

    pub fn history(&self) -> Vec<Navigation> {
        self.lock().history.clone()
    }

    /// Navigate to `target`, returning the route actually shown
    pub fn navigate(&self, target: Route) -> Route {
        self.go(target, NavigationCause::User)
    }

    /// Navigate to a location path such as `/invoices`
    pub fn navigate_path(&self, path: &str) -> Result<Route, UnknownRoute> {
        let target: Route = path.parse()?;
        Ok(self.navigate(target))
    }

    /// React to one auth event; returns the new route if it moved
    pub fn handle_event(&self, event: &AuthEvent) -> Option<Route> {
        let current = self.current();
        match event {
            AuthEvent::SessionExpired { reason } => {
                if current == Some(Route::LOGIN) {
                    debug!(%reason, "Session expired while already on login");
                    return None;
                }
                warn!(%reason, "Session expired, returning to login");
                Some(self.go(Route::LOGIN, NavigationCause::SessionExpired))
            }
            AuthEvent::LoggedOut => match current {
                Some(route) if route.requires_auth() => {
                    Some(self.go(route, NavigationCause::SessionChange))
                }
                _ => None,
            },
            AuthEvent::LoggedIn => match current {
                Some(Route::Login) => Some(self.go(Route::LOGIN, NavigationCause::SessionChange)),
                _ => None,
            },
            AuthEvent::TokenRefreshed => None,
        }
    }

    /// Apply every event already queued on `events`
    ///
    /// Returns how many events were handled.
    pub fn process_pending(&self, events: &mut broadcast::Receiver<AuthEvent>) -> usize {
        let mut handled = 0;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.handle_event(&event);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Auth event receiver lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return handled,
            }
        }
    }

    /// Handle events until every sender is gone
    pub async fn follow(&self, mut events: broadcast::Receiver<AuthEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    self.handle_event(&event);
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Auth event receiver lagged");
                }
                Err(RecvError::Closed) => {
                    debug!("Auth event channel closed");
                    return;
                }
            }
        }
    }

    fn go(&self, target: Route, cause: NavigationCause) -> Route {
        let landed = self.guard.resolve(target);
        let entry = Navigation {
            requested: target,
            landed,
            cause,
        };
        if entry.was_redirected() {
            info!(from = %target, to = %landed, ?cause, "Navigation redirected");
        } else {
            debug!(route = %landed, ?cause, "Navigated");
        }

        let mut state = self.lock();
        state.current = Some(landed);
        state.history.push(entry);
        landed
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{MemoryTokenStore, TokenPair, TokenStore};
    use backoffice_http::{AuthEvents, RefreshFailure};
    use std::sync::Arc;

    fn navigator(logged_in: bool) -> (Navigator, Arc<MemoryTokenStore>) {
        let store = Arc::new(if logged_in {
            MemoryTokenStore::with_pair(&TokenPair::new("a1", "r1"))
        } else {
            MemoryTokenStore::new()
        });
        (Navigator::new(RouteGuard::new(store.clone())), store)
    }

    fn expired() -> AuthEvent {
        AuthEvent::SessionExpired {
            reason: RefreshFailure::MissingRefreshToken,
        }
    }

    #[test]
    fn test_navigate_records_redirects() {
        let (nav, _store) = navigator(false);
        assert_eq!(nav.navigate(Route::Invoices), Route::Login);
        assert_eq!(nav.current(), Some(Route::Login));

        let history = nav.history();
        assert_eq!(history.len(), 1);
        assert!(history[0].was_redirected());
        assert_eq!(history[0].cause, NavigationCause::User);
    }

    #[test]
    fn test_root_path_lands_on_dashboard() {
        let (nav, _store) = navigator(true);
        assert_eq!(nav.navigate_path("/").unwrap(), Route::Dashboard);
        assert_eq!(nav.navigate_path("/login").unwrap(), Route::Dashboard);
        assert!(nav.navigate_path("/missing").is_err());
        assert_eq!(nav.history().len(), 2);
    }

    #[test]
    fn test_session_expired_redirects_once() {
        let (nav, store) = navigator(true);
        nav.navigate(Route::Accounting);

        store.clear().unwrap();
        assert_eq!(nav.handle_event(&expired()), Some(Route::Login));
        assert_eq!(nav.handle_event(&expired()), None);

        let expiries = nav
            .history()
            .iter()
            .filter(|n| n.cause == NavigationCause::SessionExpired)
            .count();
        assert_eq!(expiries, 1);
        assert_eq!(nav.current(), Some(Route::Login));
    }

    #[test]
    fn test_logout_leaves_protected_view() {
        let (nav, store) = navigator(true);
        nav.navigate(Route::Products);

        store.clear().unwrap();
        assert_eq!(nav.handle_event(&AuthEvent::LoggedOut), Some(Route::Login));
        assert_eq!(nav.handle_event(&AuthEvent::TokenRefreshed), None);
    }

    #[test]
    fn test_login_leaves_login_view() {
        let (nav, store) = navigator(false);
        nav.navigate(Route::Login);

        store.store_pair(&TokenPair::new("a1", "r1")).unwrap();
        assert_eq!(nav.handle_event(&AuthEvent::LoggedIn), Some(Route::Dashboard));
    }

    #[test]
    fn test_process_pending_drains_queue() {
        let (nav, store) = navigator(true);
        nav.navigate(Route::Vat);

        let events = AuthEvents::default();
        let mut rx = events.subscribe();
        store.clear().unwrap();
        events.emit(AuthEvent::TokenRefreshed);
        events.emit(expired());
        events.emit(expired());

        assert_eq!(nav.process_pending(&mut rx), 3);
        assert_eq!(nav.current(), Some(Route::Login));
        assert_eq!(nav.process_pending(&mut rx), 0);
    }

    #[tokio::test]
    async fn test_follow_stops_when_channel_closes() {
        let (nav, _store) = navigator(false);
        let events = AuthEvents::default();
        let rx = events.subscribe();
        events.emit(expired());
        drop(events);

        nav.follow(rx).await;
        assert_eq!(nav.current(), Some(Route::Login));
    }
}
