//! Error types for the retain library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API status, JSON, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for retain operations.
///
/// Authentication failures that survive recovery carry the original `401`
/// rejection, so [`Error::status`] reports the same status the caller would
/// have seen without a session client in between.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected credentials, failed refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success HTTP status returned by the API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A body could not be encoded as, or decoded from, the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input validation errors (base URL, header values).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns the HTTP status behind this error, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Auth(err) => err.rejected().map(|r| r.status),
            _ => None,
        }
    }

    /// Returns true if this error ended the session (credentials were cleared).
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::RefreshRejected { .. } | AuthError::NoRefreshCredential { .. })
        )
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password rejected by the token endpoint.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The request was rejected again after being replayed with a refreshed credential.
    #[error("unauthorized after credential refresh: {0}")]
    Unauthorized(ApiError),

    /// The refresh exchange failed; credentials were cleared.
    #[error("session expired, refresh rejected ({reason}): {rejected}")]
    RefreshRejected { rejected: ApiError, reason: String },

    /// No refresh credential was stored; credentials were cleared.
    #[error("session expired, no refresh credential: {rejected}")]
    NoRefreshCredential { rejected: ApiError },
}

impl AuthError {
    /// The `401` response that started recovery, if any.
    pub fn rejected(&self) -> Option<&ApiError> {
        match self {
            AuthError::InvalidCredentials => None,
            AuthError::Unauthorized(rejected)
            | AuthError::RefreshRejected { rejected, .. }
            | AuthError::NoRefreshCredential { rejected } => Some(rejected),
        }
    }
}

/// A non-success response from the API.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// Server-provided `detail` or `error` message, if the body carried one.
    pub detail: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create an API error from a status and raw body.
    ///
    /// The API reports problems as `{"detail": ...}` or `{"error": ...}`;
    /// either is lifted into [`ApiError::detail`].
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail.or(b.error));

        Self {
            status,
            body,
            detail,
        }
    }

    /// Check if this is an authorization failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Header name or value that cannot be sent.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_lifts_detail() {
        let err = ApiError::new(401, r#"{"detail":"Given token not valid for any token type"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(
            err.detail.as_deref(),
            Some("Given token not valid for any token type")
        );
        assert_eq!(
            err.to_string(),
            "HTTP 401: Given token not valid for any token type"
        );
    }

    #[test]
    fn api_error_lifts_error_field() {
        let err = ApiError::new(503, r#"{"error":"ML models not loaded"}"#);
        assert_eq!(err.detail.as_deref(), Some("ML models not loaded"));
    }

    #[test]
    fn api_error_keeps_non_json_body() {
        let err = ApiError::new(500, "Internal Server Error");
        assert_eq!(err.detail, None);
        assert_eq!(err.body, "Internal Server Error");
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn terminal_auth_errors_report_original_status() {
        let rejected = ApiError::new(401, "{}");
        let err = Error::from(AuthError::NoRefreshCredential { rejected });
        assert_eq!(err.status(), Some(401));
        assert!(err.is_session_expired());

        let err = Error::from(AuthError::InvalidCredentials);
        assert_eq!(err.status(), None);
        assert!(!err.is_session_expired());
    }
}
