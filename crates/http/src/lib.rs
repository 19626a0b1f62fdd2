//! Backoffice HTTP client
//!
//! Authenticated access to the ERP backend: bearer-token attachment, one
//! shared token refresh per expiry, a single replay of the rejected request,
//! and typed auth events for whoever handles navigation.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::events::{AuthEvent, AuthEvents};
pub use client::interceptor::{BearerAuth, RequestInterceptor};
pub use client::refresh::{RefreshFailure, RefreshState};
pub use client::{ApiClient, ApiClientBuilder, ApiResponse, PendingRequest};
pub use types::{Credentials, Listing, Record};
