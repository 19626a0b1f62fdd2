//! Backoffice HTTP client
//!
//! [`ApiClient`] is the single gateway to the backend. Every request runs
//! through the client's interceptor chain (by default: bearer token from the
//! Token Store) and a 401 answer triggers one token refresh and one replay.

pub mod admin_dashboard;
pub mod auth;
pub mod error;
pub mod events;
pub mod interceptor;
pub mod refresh;
pub mod request;
pub mod service;
pub mod shop;

use crate::types::{Listing, Record};
use backoffice_core::TokenStore;
pub use error::ClientError;
use events::{AuthEvent, AuthEvents};
use interceptor::{BearerAuth, RequestInterceptor};
use refresh::{RefreshCoordinator, RefreshState, Trigger};
use request::Transport;
pub use request::{ApiResponse, PendingRequest};
use reqwest::{ClientBuilder, Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = concat!("backoffice-client/", env!("CARGO_PKG_VERSION"));

/// Authenticated API client
///
/// Cheap to clone; clones share the token store, interceptors and the
/// in-flight refresh.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Transport,
    store: Arc<dyn TokenStore>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    refresh: RefreshCoordinator,
    events: AuthEvents,
}

impl ApiClient {
    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.inner.transport.base_url()
    }

    /// Token store this client reads and writes
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Subscribe to login/logout/session-expiry events
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    /// Event channel shared with the refresh coordinator
    pub fn events(&self) -> &AuthEvents {
        &self.inner.events
    }

    /// Whether a token refresh is currently running
    pub fn refresh_state(&self) -> RefreshState {
        self.inner.refresh.state()
    }

    /// Send a request and return the successful response
    ///
    /// Non-2xx answers become typed errors. A 401 is retried once after a
    /// token refresh; if the refresh fails the tokens are cleared and
    /// [`ClientError::AuthRefreshFailed`] is returned.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
    ) -> Result<ApiResponse, ClientError> {
        self.execute(PendingRequest::new(method, path).with_body(body))
            .await
    }

    /// Send a prepared request through the interceptors and 401 recovery
    pub async fn execute(&self, request: PendingRequest) -> Result<ApiResponse, ClientError> {
        let outgoing = self.intercept(request.clone())?;
        let response = self.inner.transport.send(&outgoing).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return response.error_for_status();
        }

        debug!(path = %request.path, "Received 401, renewing access token");
        self.inner
            .refresh
            .renew(Trigger::Rejected {
                sent_with: outgoing.bearer_token(),
            })
            .await
            .map_err(ClientError::AuthRefreshFailed)?;

        // Single replay; a second 401 is returned as-is
        let replay = self.intercept(request)?;
        debug!(path = %replay.path, "Replaying request with renewed token");
        self.inner.transport.send(&replay).await?.error_for_status()
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.request(Method::GET, path, None).await?.json()
    }

    /// POST `body` to `path` and decode the JSON answer
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = PendingRequest::new(Method::POST, path).json(body)?;
        self.execute(request).await?.json()
    }

    /// GET a list endpoint, accepting paginated or bare-array answers
    pub async fn get_listing(&self, path: &str) -> Result<Vec<Record>, ClientError> {
        Ok(self.get_json::<Listing<Record>>(path).await?.into_items())
    }

    fn intercept(&self, mut request: PendingRequest) -> Result<PendingRequest, ClientError> {
        for interceptor in &self.inner.interceptors {
            interceptor.intercept(&mut request)?;
        }
        Ok(request)
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    events: Option<AuthEvents>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ApiClientBuilder {
    /// Set the base URL, e.g. `http://localhost:8000/api`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the token store (required)
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Append an interceptor; it runs after the built-in bearer interceptor
    pub fn interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Publish auth events on an existing channel
    pub fn events(mut self, events: AuthEvents) -> Self {
        self.events = Some(events);
        self
    }

    /// Set the request timeout (ignored in the browser)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;
        url::Url::parse(&base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url '{base_url}': {e}")))?;
        let store = self
            .token_store
            .ok_or_else(|| ClientError::Configuration("token_store is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut client_builder = ClientBuilder::new().default_headers(default_headers);

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        client_builder = client_builder.user_agent(
            self.user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );

        let transport = Transport::new(client_builder.build()?, base_url);
        let events = self.events.unwrap_or_default();

        let mut interceptors: Vec<Arc<dyn RequestInterceptor>> =
            vec![Arc::new(BearerAuth::new(Arc::clone(&store)))];
        interceptors.extend(self.interceptors);

        let refresh = RefreshCoordinator::new(transport.clone(), Arc::clone(&store), events.clone());

        Ok(ApiClient {
            inner: Arc::new(Inner {
                transport,
                store,
                interceptors,
                refresh,
                events,
            }),
        })
    }
}
