//! Shopping cart.

use bookstand_core::{BookId, Cart, CartItem, CartItemId, UserId};
use serde_json::json;
use tracing::{error, instrument};

use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

/// Cart operations.
#[derive(Debug, Clone, Copy)]
pub struct Carts<'a> {
    api: &'a ApiClient,
}

impl<'a> Carts<'a> {
    pub(crate) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// A user's cart. No payload means an empty cart; a malformed `items`
    /// field yields no lines.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/cart").query("user_id", user_id))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch cart"))?;
        if payload.is_empty() {
            return Ok(Cart::default());
        }
        let items: Vec<CartItem> = payload.list_or_empty("items");
        let total = payload.field("total").unwrap_or(items.len() as u64);
        Ok(Cart { items, total })
    }

    /// Add copies of a book. The backend merges with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for a zero quantity, otherwise the
    /// adapter's error (e.g. a 400 when stock is insufficient).
    #[instrument(skip(self), fields(user_id = %user_id, book_id = %book_id))]
    pub async fn add_to_cart(&self, user_id: UserId, book_id: BookId, quantity: u32) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            ensure_positive(quantity)?;
            let body = json!({ "user_id": user_id, "book_id": book_id, "quantity": quantity });
            self.api
                .execute(ApiRequest::post("/cart/add").json(&body)?)
                .await?;
            Ok(())
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to add to cart"))
    }

    /// Set the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for a zero quantity, otherwise the
    /// adapter's error.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn update_cart_item(&self, cart_id: CartItemId, quantity: u32) -> Result<(), ApiError> {
        let result: Result<(), ApiError> = async {
            ensure_positive(quantity)?;
            let body = json!({ "cart_id": cart_id, "quantity": quantity });
            self.api
                .execute(ApiRequest::put("/cart/update").json(&body)?)
                .await?;
            Ok(())
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to update cart item"))
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(&self, cart_id: CartItemId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete("/cart/remove").query("cart_id", cart_id))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to remove cart item"))?;
        Ok(())
    }

    /// Empty a user's cart.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn clear_cart(&self, user_id: UserId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete("/cart/clear").query("user_id", user_id))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to clear cart"))?;
        Ok(())
    }
}

fn ensure_positive(quantity: u32) -> Result<(), ApiError> {
    if quantity == 0 {
        return Err(ApiError::Invalid("quantity must be at least 1".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(ensure_positive(1).is_ok());
        assert!(matches!(ensure_positive(0), Err(ApiError::Invalid(_))));
    }
}
