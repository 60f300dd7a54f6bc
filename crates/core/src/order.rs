//! Orders and order lines.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::timestamp;
use crate::{BookId, OrderId, OrderStatus, UserId};

/// A placed order.
///
/// Listings omit `items`; the detail endpoint fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Backend-generated unique number (`ORD` + timestamp + user id).
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Present on admin listings and detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, with = "timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of line subtotals.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.items.iter().filter_map(OrderItem::line_total).sum()
    }

    /// Whether `total_amount` equals the sum of its lines.
    ///
    /// The backend computes both; this is a display-side consistency check
    /// and is only meaningful when the items are loaded.
    #[must_use]
    pub fn total_matches_items(&self) -> bool {
        self.items.is_empty() || self.items_total() == self.total_amount
    }
}

/// A single order line with denormalized book fields for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub book_id: BookId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_image: Option<String>,
    pub quantity: u32,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<Decimal>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtotal: Option<Decimal>,
}

impl OrderItem {
    /// The line subtotal, derived from the unit price when the backend
    /// omitted it.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.subtotal
            .or_else(|| self.unit_price.map(|price| price * Decimal::from(self.quantity)))
    }
}

/// Paged order listing returned to the admin back-office.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

/// Acknowledgement returned by order checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub order_id: OrderId,
    pub order_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}
