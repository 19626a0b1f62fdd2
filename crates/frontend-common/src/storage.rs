//! Browser localStorage token store

use backoffice_core::{CoreError, CoreResult, TokenKind, TokenStore};
use gloo::storage::{LocalStorage, Storage};

/// Tokens in `window.localStorage` under `access_token` / `refresh_token`
///
/// Survives page reloads. Storage that is unavailable (private mode, quota)
/// reads as "no token".
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTokenStore;

impl WebTokenStore {
    pub fn new() -> Self {
        Self
    }
}

impl TokenStore for WebTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        LocalStorage::raw()
            .get_item(kind.storage_key())
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, kind: TokenKind, value: &str) -> CoreResult<()> {
        LocalStorage::raw()
            .set_item(kind.storage_key(), value)
            .map_err(|e| CoreError::storage_error(format!("localStorage write failed: {e:?}")))
    }

    fn clear(&self) -> CoreResult<()> {
        let storage = LocalStorage::raw();
        for kind in TokenKind::ALL {
            storage
                .remove_item(kind.storage_key())
                .map_err(|e| CoreError::storage_error(format!("localStorage remove failed: {e:?}")))?;
        }
        Ok(())
    }
}
