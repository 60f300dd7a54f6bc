//! Catalog events published by the back-office.

use std::fmt::Display;

use bookstand_client::Event;
use bookstand_core::{Book, BookId, LowStockReport};

/// Something changed in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminEvent {
    /// A book was created. `book` is `None` when the backend confirmed the
    /// insert without returning the stored record.
    NewBookAdded { title: String, book: Option<Book> },
    /// A book was deleted.
    BookRemoved(BookId),
    /// A stock check found books under the threshold.
    LowStockAlert(LowStockReport),
}

/// Kinds of [`AdminEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminEventKind {
    NewBookAdded,
    BookRemoved,
    LowStockAlert,
}

impl AdminEventKind {
    pub const ALL: [Self; 3] = [Self::NewBookAdded, Self::BookRemoved, Self::LowStockAlert];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewBookAdded => "new-book-added",
            Self::BookRemoved => "book-removed",
            Self::LowStockAlert => "low-stock-alert",
        }
    }
}

impl Display for AdminEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminEventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown event kind: {s}"))
    }
}

impl Event for AdminEvent {
    type Kind = AdminEventKind;

    fn kind(&self) -> AdminEventKind {
        match self {
            Self::NewBookAdded { .. } => AdminEventKind::NewBookAdded,
            Self::BookRemoved(_) => AdminEventKind::BookRemoved,
            Self::LowStockAlert(_) => AdminEventKind::LowStockAlert,
        }
    }
}
