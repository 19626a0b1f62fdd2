//! Backoffice core types and utilities
//!
//! Session token model, the injectable Token Store, client configuration and
//! tracing setup shared by the HTTP client and its front ends.

pub mod config;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod state_dir;
pub mod token_store;
pub mod tokens;
pub mod tracing;

pub use config::ClientSettings;
pub use error::{CoreError, CoreResult};
#[cfg(not(target_arch = "wasm32"))]
pub use state_dir::StateDir;
#[cfg(not(target_arch = "wasm32"))]
pub use token_store::FileTokenStore;
pub use token_store::{MemoryTokenStore, TokenStore};
pub use tokens::{TokenKind, TokenPair};
