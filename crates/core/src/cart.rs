//! Shopping cart lines.
//!
//! A cart only lives while a customer holds unpurchased selections; checkout
//! converts it into an [`crate::Order`] and the backend empties it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BookId, CartItemId};

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart line ID, used for update and remove.
    pub id: CartItemId,
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
    /// Copies currently in stock for the referenced book.
    #[serde(default)]
    pub stock: u32,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Whether the requested quantity exceeds what is in stock.
    #[must_use]
    pub const fn exceeds_stock(&self) -> bool {
        self.quantity > self.stock
    }
}

/// A customer's cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Number of lines, as counted by the backend.
    #[serde(default)]
    pub total: u64,
}

impl Cart {
    /// Sum of all line subtotals.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_amount() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "items": [
                {"id": 1, "book_id": 3, "title": "A", "author": "x", "price": 10.5,
                 "image": null, "quantity": 2, "stock": 5},
                {"id": 2, "book_id": 4, "title": "B", "author": "y", "price": 3,
                 "quantity": 1, "stock": 0}
            ],
            "total": 2
        }))
        .unwrap();

        assert_eq!(cart.amount(), Decimal::new(2400, 2));
        assert!(!cart.items[0].exceeds_stock());
        assert!(cart.items[1].exceeds_stock());
    }

    #[test]
    fn test_default_cart_is_empty() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.amount(), Decimal::ZERO);
    }
}
