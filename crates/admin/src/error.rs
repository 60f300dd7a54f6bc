//! Back-office errors.

use bookstand_client::{ApiError, SessionError};
use thiserror::Error;

/// Errors surfaced by the [`Admin`](crate::Admin) facade.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session could not be read or persisted.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Credentials were valid but the account is not an admin. The session
    /// has been cleared.
    #[error("{0}")]
    NotAdmin(&'static str),
}
