//! Client error types

use super::refresh::RefreshFailure;
use backoffice_core::CoreError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error; no usable response was received
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Request was rejected as unauthenticated and could not be recovered
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Session could not be renewed; tokens have been cleared
    #[error("Session expired: {0}")]
    AuthRefreshFailed(RefreshFailure),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request (server-side validation failed)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A header could not be built, e.g. a token with control characters
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// Token storage failed
    #[error("Token storage failed: {0}")]
    Storage(#[from] CoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status the server answered with, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the session ended and the user must log in again
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::AuthRefreshFailed(_))
    }

    /// Whether no response was received at all
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_taxonomy() {
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, "bad".into()),
            ClientError::BadRequest(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, "no".into()),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::FORBIDDEN, "no".into()),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, "gone".into()),
            ClientError::NotFound(_)
        ));

        let err = ClientError::from_status(StatusCode::SERVICE_UNAVAILABLE, "down".into());
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_session_expired());
    }

    #[test]
    fn test_refresh_failure_is_session_expired() {
        let err = ClientError::AuthRefreshFailed(RefreshFailure::MissingRefreshToken);
        assert!(err.is_session_expired());
        assert_eq!(err.status(), None);
    }
}
