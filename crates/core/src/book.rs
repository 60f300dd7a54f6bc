//! Book catalog records.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::timestamp;
use crate::{BookId, CategoryId};

/// A catalog book.
///
/// `stock` is unsigned so the non-negative invariant holds by construction;
/// a backend payload with a negative stock fails to decode instead of
/// leaking into the views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Availability flag as reported by the backend (e.g. `available`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, with = "timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::optional", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Book {
    /// Whether at least one copy can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A book category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Catalog totals shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BooksCount {
    /// Number of available titles.
    pub total: u64,
    /// Copies in stock across available titles.
    #[serde(rename = "totalStock", default)]
    pub total_stock: u64,
}

/// A book whose stock fell under the backend's low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockBook {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    pub stock: u32,
}

/// Result of the low-stock query, ordered by ascending stock.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LowStockReport {
    #[serde(default)]
    pub books: Vec<LowStockBook>,
    #[serde(default)]
    pub total: u64,
}

impl LowStockReport {
    /// True when no book is under the threshold.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
