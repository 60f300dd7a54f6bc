//! Normalized request failures.
//!
//! Every failure the adapter can produce falls into one of the kinds in
//! [`ErrorKind`]. Resource functions log their own context and return the
//! same [`ApiError`] value they received, so callers always see the original
//! status and body.

use reqwest::StatusCode;
use thiserror::Error;

use crate::envelope::ShapeMismatch;

/// Errors that can occur when talking to the bookstore backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("Server error {status}: {}", message.as_deref().unwrap_or("(no message)"))]
    Server {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// `message` field of the error envelope, when the body had one.
        message: Option<String>,
        /// Raw response body.
        body: String,
    },

    /// The request went out but no response came back (connect failure,
    /// timeout, dropped connection).
    #[error("Connectivity error: {0}")]
    Connectivity(#[source] reqwest::Error),

    /// The request could not be built or sent at all.
    #[error("Request construction error: {0}")]
    RequestConstruction(String),

    /// A 2xx response whose payload lacked fields the caller requires.
    #[error("Unexpected response shape: {0}")]
    Shape(#[from] ShapeMismatch),

    /// A payload was rejected before sending.
    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Server,
    Connectivity,
    RequestConstruction,
    Shape,
    Invalid,
}

impl ApiError {
    /// Classify a transport-level failure from `reqwest`.
    ///
    /// Builder failures never reached the network, everything else did.
    #[must_use]
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::RequestConstruction(err.to_string())
        } else {
            Self::Connectivity(err)
        }
    }

    /// The kind of failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Server { .. } => ErrorKind::Server,
            Self::Connectivity(_) => ErrorKind::Connectivity,
            Self::RequestConstruction(_) => ErrorKind::RequestConstruction,
            Self::Shape(_) => ErrorKind::Shape,
            Self::Invalid(_) => ErrorKind::Invalid,
        }
    }

    /// HTTP status for server errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the caller's credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    /// Emit the adapter-level log line for this failure.
    pub(crate) fn log(&self, method: &reqwest::Method, url: &str) {
        match self {
            Self::Server { status, body, .. } => tracing::error!(
                %method,
                url,
                status = status.as_u16(),
                body = %body.chars().take(500).collect::<String>(),
                "API request failed: server returned an error status"
            ),
            Self::Connectivity(err) => tracing::error!(
                %method,
                url,
                error = %err,
                timeout = err.is_timeout(),
                "API request failed: network error, no response from server"
            ),
            Self::RequestConstruction(msg) => tracing::error!(
                %method,
                url,
                error = %msg,
                "API request failed: request configuration error"
            ),
            Self::Shape(mismatch) => tracing::error!(
                %method,
                url,
                %mismatch,
                "API request failed: response is not a valid envelope"
            ),
            Self::Invalid(msg) => tracing::warn!(%method, url, error = %msg, "API request rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = ApiError::Server {
            status: StatusCode::BAD_REQUEST,
            message: Some("库存不足".to_string()),
            body: r#"{"code":400,"message":"库存不足"}"#.to_string(),
        };
        assert_eq!(err.to_string(), "Server error 400 Bad Request: 库存不足");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_server_error_without_message() {
        let err = ApiError::Server {
            status: StatusCode::BAD_GATEWAY,
            message: None,
            body: "<html>bad gateway</html>".to_string(),
        };
        assert_eq!(err.to_string(), "Server error 502 Bad Gateway: (no message)");
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Server {
            status: StatusCode::UNAUTHORIZED,
            message: None,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
        assert!(!ApiError::Invalid("x".to_string()).is_unauthorized());
    }

    #[test]
    fn test_kinds_without_status() {
        let err = ApiError::RequestConstruction("relative URL without a base".to_string());
        assert_eq!(err.kind(), ErrorKind::RequestConstruction);
        assert_eq!(err.status(), None);
    }
}
