//! Storefront errors.

use bookstand_client::{ApiError, SessionError};
use thiserror::Error;

/// Errors surfaced by the [`Storefront`](crate::Storefront) facade.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session could not be read or persisted.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The operation needs a logged-in user with a known ID.
    #[error("Not logged in")]
    NotLoggedIn,

    /// Registration was attempted with an existing username.
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Checkout was attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,
}
