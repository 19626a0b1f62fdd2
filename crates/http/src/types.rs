//! Request and response bodies exchanged with the backend

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Backend record passed through untouched (product, invoice, entry, ...)
pub type Record = JsonValue;

/// Login body for `POST /auth/token/`
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /auth/token/refresh/`
#[derive(Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// Error body the backend sends on failures, e.g. `{"detail": "..."}`
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// List endpoints answer either with a paginated envelope or a bare array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

/// Paginated envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Listing<T> {
    /// Items of this listing, whichever shape the server used
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Page(page) => page.results,
            Self::Items(items) => items,
        }
    }
}
