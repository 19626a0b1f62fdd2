//! Route table and navigation guard

use backoffice_core::TokenStore;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Views of the admin client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Products,
    Invoices,
    Accounting,
    Vat,
}

impl Route {
    pub const ALL: [Self; 6] = [
        Self::Login,
        Self::Dashboard,
        Self::Products,
        Self::Invoices,
        Self::Accounting,
        Self::Vat,
    ];

    /// Entry point for unauthenticated users
    pub const LOGIN: Self = Self::Login;

    /// Landing page after login
    pub const DEFAULT_LANDING: Self = Self::Dashboard;

    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Products => "/products",
            Self::Invoices => "/invoices",
            Self::Accounting => "/accounting",
            Self::Vat => "/vat",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Products => "Products",
            Self::Invoices => "Invoices",
            Self::Accounting => "Accounting",
            Self::Vat => "VAT",
        }
    }

    /// Whether the view is only reachable with a session
    pub const fn requires_auth(self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Match a location path; `/` is an alias of the landing page
    ///
    /// Query strings, fragments and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::DEFAULT_LANDING);
        }
        Self::ALL.into_iter().find(|route| route.path() == trimmed)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Location that matches no route
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matches '{0}'")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

/// Outcome of evaluating a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(Route),
}

/// Decide whether a navigation to `target` may proceed
///
/// 1. Protected view without a session goes to login.
/// 2. Login with a session goes to the landing page.
/// 3. Anything else proceeds.
pub fn decide(target: Route, is_authenticated: bool) -> NavigationDecision {
    if target.requires_auth() && !is_authenticated {
        NavigationDecision::Redirect(Route::LOGIN)
    } else if target == Route::LOGIN && is_authenticated {
        NavigationDecision::Redirect(Route::DEFAULT_LANDING)
    } else {
        NavigationDecision::Proceed
    }
}

/// [`decide`] bound to a Token Store
///
/// Authentication is read from the store on every check, never cached.
#[derive(Clone)]
pub struct RouteGuard {
    store: Arc<dyn TokenStore>,
}

impl RouteGuard {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn check(&self, target: Route) -> NavigationDecision {
        decide(target, self.is_authenticated())
    }

    /// Route the user actually lands on when asking for `target`
    pub fn resolve(&self, target: Route) -> Route {
        match self.check(target) {
            NavigationDecision::Proceed => target,
            NavigationDecision::Redirect(route) => route,
        }
    }
}
