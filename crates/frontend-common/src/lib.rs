//! Navigation and domain state shared by backoffice frontends
//!
//! The [`RouteGuard`] gates protected views on the Token Store, the
//! [`Navigator`] applies its decisions and reacts to session expiry published
//! by the HTTP client, and [`store`] holds the per-domain action modules.

pub mod navigator;
pub mod router;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod logging;
#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use navigator::{Navigation, NavigationCause, Navigator};
pub use router::{NavigationDecision, Route, RouteGuard, UnknownRoute, decide};
pub use store::AppStore;

#[cfg(target_arch = "wasm32")]
pub use logging::init_web_logging;
#[cfg(target_arch = "wasm32")]
pub use storage::WebTokenStore;
