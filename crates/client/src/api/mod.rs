//! Resource API modules.
//!
//! Each module wraps one backend entity. Handles are borrowed from an
//! [`ApiClient`](crate::ApiClient) and are free to create:
//!
//! ```rust,ignore
//! let low = client.books().low_stock_books().await?;
//! client.orders().cancel_order(OrderId::new(9)).await?;
//! ```
//!
//! Every operation logs a module-specific message on failure and returns the
//! adapter's error unchanged. List operations never fail on an unexpected
//! payload shape; they resolve to an empty list instead.

pub mod addresses;
pub mod books;
pub mod cart;
pub mod orders;
pub mod users;

pub use addresses::{AddressUpdate, NewAddress};
pub use books::{BookSearch, BookUpdate, NewBook};
pub use orders::{NewOrder, NewOrderItem};
pub use users::{LoginRequest, NewUser, PasswordChange, ProfileUpdate, RegisterRequest, UserUpdate};

use rust_decimal::Decimal;

use crate::error::ApiError;

/// Reject a negative amount before it reaches the backend.
pub(crate) fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), ApiError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ApiError::Invalid(format!("{field} must not be negative (got {value})")));
    }
    Ok(())
}

/// Reject a blank required string before it reaches the backend.
pub(crate) fn ensure_present(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Invalid(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("price", Decimal::ZERO).is_ok());
        assert!(ensure_non_negative("price", Decimal::new(1250, 2)).is_ok());
        let err = ensure_non_negative("price", Decimal::new(-1, 2)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: price must not be negative (got -0.01)"
        );
    }

    #[test]
    fn test_ensure_present() {
        assert!(ensure_present("title", "Dune").is_ok());
        assert!(matches!(ensure_present("title", "  "), Err(ApiError::Invalid(_))));
    }
}
