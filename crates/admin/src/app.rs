//! Session-bound back-office facade.

use bookstand_client::api::{LoginRequest, NewBook};
use bookstand_client::{
    ApiClient, ClientConfig, EventChannel, GuardDecision, NavigationGuard, Route, Session,
};
use bookstand_core::{Book, BookId, BooksCount, LoginResponse, LowStockReport, Role, UsersCount};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

use crate::error::AdminError;
use crate::events::AdminEvent;
use crate::route::AdminRoute;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub books: BooksCount,
    pub users: UsersCount,
    pub orders: u64,
    pub low_stock: u64,
}

/// The back-office application.
#[derive(Debug, Clone)]
pub struct Admin {
    api: ApiClient,
    guard: NavigationGuard,
    events: EventChannel<AdminEvent>,
}

impl Admin {
    /// Build a back-office over `session`.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, AdminError> {
        let api = ApiClient::new(config, session.clone())?;
        Ok(Self {
            api,
            guard: NavigationGuard::new(session),
            events: EventChannel::new(),
        })
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// Channel catalog events are published on.
    #[must_use]
    pub const fn events(&self) -> &EventChannel<AdminEvent> {
        &self.events
    }

    /// Run the navigation guard for `path`.
    #[must_use]
    pub fn navigate(&self, path: &str) -> GuardDecision<AdminRoute> {
        self.guard.navigate(path)
    }

    /// Log in. Only admin accounts are accepted.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotAdmin` (with the session cleared) for a
    /// non-admin account, `AdminError::Api` if the backend rejects the login.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: SecretString,
    ) -> Result<LoginResponse, AdminError> {
        let login = self
            .api
            .users()
            .login(&LoginRequest::new(username, password))
            .await?;
        self.session().begin(&login)?;

        if login.role != Role::Admin {
            warn!(username = %login.username, "Non-admin login to the back-office");
            self.session().clear()?;
            return Err(AdminError::NotAdmin(AdminRoute::DENIAL_NOTICE));
        }

        info!(username = %login.username, "Admin logged in");
        Ok(login)
    }

    /// Clear the session.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Session` if a key cannot be removed.
    pub fn logout(&self) -> Result<(), AdminError> {
        self.session().clear()?;
        info!("Admin logged out");
        Ok(())
    }

    /// Create a book and announce it.
    ///
    /// Returns `None` when the backend accepted the book but did not send it
    /// back; the announcement still goes out.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend rejects the book.
    pub async fn add_book(&self, book: &NewBook) -> Result<Option<Book>, AdminError> {
        let created = self.api.books().add_book(book).await?;
        match &created {
            Some(stored) => info!(book_id = %stored.id, title = %stored.title, "Book added"),
            None => warn!(title = %book.title, "Book added but the backend returned no record"),
        }
        self.announce(&AdminEvent::NewBookAdded {
            title: book.title.clone(),
            book: created.clone(),
        });
        Ok(created)
    }

    /// Delete a book and announce it.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend refuses the deletion.
    pub async fn delete_book(&self, id: BookId) -> Result<(), AdminError> {
        self.api.books().delete_book(id).await?;
        info!(book_id = %id, "Book removed");
        self.announce(&AdminEvent::BookRemoved(id));
        Ok(())
    }

    /// Fetch low-stock books, raising an alert when there are any.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn check_low_stock(&self) -> Result<LowStockReport, AdminError> {
        let report = self.api.books().low_stock_books().await?;
        if !report.is_empty() {
            warn!(count = report.books.len(), "Low stock detected");
            self.announce(&AdminEvent::LowStockAlert(report.clone()));
        }
        Ok(report)
    }

    /// Gather dashboard totals.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if any request fails.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, AdminError> {
        let books = self.api.books().books_count().await?;
        let users = self.api.users().users_count().await?;
        let orders = self.api.orders().all_orders().await?.total;
        let low_stock = self.check_low_stock().await?.total;

        Ok(DashboardSummary {
            books,
            users,
            orders,
            low_stock,
        })
    }

    /// Publish after a completed mutation. Listener failures are logged by
    /// the channel and do not undo the mutation.
    fn announce(&self, event: &AdminEvent) {
        if let Err(e) = self.events.publish(event) {
            warn!(error = %e, "Some listeners failed to handle a catalog event");
        }
    }
}
