use super::{TokenStore, non_empty};
use crate::error::CoreResult;
use crate::tokens::{TokenKind, TokenPair};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// In-process token store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<TokenKind, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a token pair
    pub fn with_pair(pair: &TokenPair) -> Self {
        let tokens = TokenKind::ALL
            .into_iter()
            .map(|kind| (kind, pair.get(kind).to_string()))
            .collect();
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        non_empty(tokens.get(&kind))
    }

    fn set(&self, kind: TokenKind, value: &str) -> CoreResult<()> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(kind, value.to_string());
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_is_unauthenticated() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(TokenKind::Access), None);
        assert_eq!(store.get(TokenKind::Refresh), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_set_overwrites_and_clear_removes_both() {
        let store = MemoryTokenStore::new();
        store.set(TokenKind::Access, "a1").unwrap();
        store.set(TokenKind::Access, "a2").unwrap();
        store.set(TokenKind::Refresh, "r1").unwrap();

        assert_eq!(store.get(TokenKind::Access).as_deref(), Some("a2"));
        assert!(store.is_authenticated());

        store.clear().unwrap();
        assert_eq!(store.get(TokenKind::Access), None);
        assert_eq!(store.get(TokenKind::Refresh), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_empty_access_token_is_not_authenticated() {
        let store = MemoryTokenStore::with_pair(&TokenPair::new("a1", "r1"));
        store.set(TokenKind::Access, "").unwrap();
        assert_eq!(store.get(TokenKind::Access), None);
        assert!(!store.is_authenticated());
        assert_eq!(store.get(TokenKind::Refresh).as_deref(), Some("r1"));
    }
}
