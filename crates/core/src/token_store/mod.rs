//! Token Store: persisted holder for the access/refresh token pair
//!
//! The store is passed explicitly to every component that needs it (HTTP
//! client, route guard, session actions). Authentication state is never
//! stored on its own; it is derived from the access token on every read.

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::CoreResult;
use crate::tokens::{TokenKind, TokenPair};

/// Key-value holder for session tokens
///
/// Implementations must treat tokens as opaque strings and must return `None`
/// for a token that was never set, was cleared, or was set to an empty value.
pub trait TokenStore: Send + Sync {
    /// Current token of the given kind
    fn get(&self, kind: TokenKind) -> Option<String>;

    /// Overwrite the token of the given kind
    fn set(&self, kind: TokenKind, value: &str) -> CoreResult<()>;

    /// Remove both tokens
    fn clear(&self) -> CoreResult<()>;

    /// Whether a non-empty access token is present
    fn is_authenticated(&self) -> bool {
        self.get(TokenKind::Access)
            .is_some_and(|token| !token.is_empty())
    }

    /// Store a freshly issued pair
    fn store_pair(&self, pair: &TokenPair) -> CoreResult<()> {
        for kind in TokenKind::ALL {
            self.set(kind, pair.get(kind))?;
        }
        Ok(())
    }
}

/// Drop empty values so "set to empty" behaves like "cleared"
pub(crate) fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|token| !token.is_empty()).cloned()
}
