//! Books and categories.

use bookstand_core::{Book, BookId, BooksCount, Category, CategoryId, LowStockBook, LowStockReport};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, instrument};

use super::{ensure_non_negative, ensure_present};
use crate::error::ApiError;
use crate::http::{ApiClient, ApiRequest};

/// Payload for `POST /books`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NewBook {
    /// A book with only the required fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            price,
            stock,
            isbn: None,
            category_id: None,
            description: None,
            image: None,
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        ensure_present("title", &self.title)?;
        ensure_present("author", &self.author)?;
        ensure_non_negative("price", self.price)
    }
}

/// Partial update for `PUT /books/:id`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl BookUpdate {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::Invalid("book update has no fields".to_string()));
        }
        if let Some(title) = &self.title {
            ensure_present("title", title)?;
        }
        if let Some(price) = self.price {
            ensure_non_negative("price", price)?;
        }
        Ok(())
    }
}

/// Query for `GET /books/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSearch {
    /// Matched against title, author and ISBN.
    pub q: Option<String>,
    /// Category name.
    pub category: Option<String>,
}

impl BookSearch {
    #[must_use]
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            category: None,
        }
    }
}

/// Book and category operations.
#[derive(Debug, Clone, Copy)]
pub struct Books<'a> {
    api: &'a ApiClient,
}

impl<'a> Books<'a> {
    pub(crate) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_books(&self) -> Result<Vec<Book>, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/books"))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch book list"))?;
        Ok(payload.list_or_empty("books"))
    }

    /// Fetch one book. `None` when the backend returns no data.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails (including 404).
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn book_by_id(&self, id: BookId) -> Result<Option<Book>, ApiError> {
        let result: Result<Option<Book>, ApiError> = async {
            let payload = self
                .api
                .execute(ApiRequest::get(format!("/books/{id}")))
                .await?;
            Ok(payload.optional()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to fetch book detail"))
    }

    /// Search by keyword and/or category.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn search_books(&self, search: &BookSearch) -> Result<Vec<Book>, ApiError> {
        let request = ApiRequest::get("/books/search")
            .query_opt("q", search.q.as_deref())
            .query_opt("category", search.category.as_deref());
        let payload = self
            .api
            .execute(request)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to search books"))?;
        Ok(payload.list_or_empty("books"))
    }

    /// Catalog totals.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails, or `ApiError::Shape`
    /// if the payload is missing.
    #[instrument(skip(self))]
    pub async fn books_count(&self) -> Result<BooksCount, ApiError> {
        let result: Result<BooksCount, ApiError> = async {
            let payload = self
                .api
                .execute(ApiRequest::get("/books/count"))
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to fetch book statistics"))
    }

    /// Books under the backend's low-stock threshold.
    ///
    /// A malformed `books` field yields an empty report.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn low_stock_books(&self) -> Result<LowStockReport, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/books/low-stock"))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch low-stock books"))?;
        let books: Vec<LowStockBook> = payload.list_or_empty("books");
        let total = payload.field("total").unwrap_or(books.len() as u64);
        Ok(LowStockReport { books, total })
    }

    /// Create a book. `None` when the backend confirms the insert without
    /// returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for a blank title/author or negative price,
    /// otherwise the adapter's error.
    #[instrument(skip(self, book), fields(title = %book.title))]
    pub async fn add_book(&self, book: &NewBook) -> Result<Option<Book>, ApiError> {
        let result: Result<Option<Book>, ApiError> = async {
            book.validate()?;
            let payload = self
                .api
                .execute(ApiRequest::post("/books").json(book)?)
                .await?;
            Ok(payload.optional()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to add book"))
    }

    /// Update a book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Invalid` for an empty update or negative price,
    /// otherwise the adapter's error.
    #[instrument(skip(self, update), fields(book_id = %id))]
    pub async fn update_book(&self, id: BookId, update: &BookUpdate) -> Result<Book, ApiError> {
        let result: Result<Book, ApiError> = async {
            update.validate()?;
            let payload = self
                .api
                .execute(ApiRequest::put(format!("/books/{id}")).json(update)?)
                .await?;
            Ok(payload.entity()?)
        }
        .await;
        result.inspect_err(|e| error!(error = %e, "Failed to update book"))
    }

    /// Delete a book.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn delete_book(&self, id: BookId) -> Result<(), ApiError> {
        self.api
            .execute(ApiRequest::delete(format!("/books/{id}")))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to delete book"))?;
        Ok(())
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_categories(&self) -> Result<Vec<Category>, ApiError> {
        let payload = self
            .api
            .execute(ApiRequest::get("/categories"))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch categories"))?;
        Ok(payload.list_or_empty("categories"))
    }
}
