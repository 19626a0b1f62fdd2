//! Access/refresh token model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two session credentials is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived credential sent as `Authorization: Bearer`
    Access,
    /// Longer-lived credential used only to mint a new access token
    Refresh,
}

impl TokenKind {
    /// Both kinds, in the order they are persisted
    pub const ALL: [Self; 2] = [Self::Access, Self::Refresh];

    /// Fixed key under which the token is persisted
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Token pair issued by `POST /auth/token/`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Token of the requested kind
    pub fn get(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_fixed() {
        assert_eq!(TokenKind::Access.storage_key(), "access_token");
        assert_eq!(TokenKind::Refresh.storage_key(), "refresh_token");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let pair = TokenPair::new("secret-access", "secret-refresh");
        let rendered = format!("{pair:?}");
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_deserialize_login_response() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access":"a1","refresh":"r1"}"#).unwrap();
        assert_eq!(pair.get(TokenKind::Access), "a1");
        assert_eq!(pair.get(TokenKind::Refresh), "r1");
    }
}
