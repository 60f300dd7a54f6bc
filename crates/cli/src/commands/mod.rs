//! Command implementations.
//!
//! Each module owns the clap subcommand enum for one area and a `run`
//! function that executes it against a [`Context`].

pub mod addresses;
pub mod auth;
pub mod books;
pub mod cart;
pub mod navigate;
pub mod orders;
pub mod users;

use bookstand_admin::{Admin, AdminError, AdminEvent, AdminEventKind};
use bookstand_client::{ApiError, FileSessionStore, Session, SessionError};
use bookstand_core::UserId;
use bookstand_storefront::{Storefront, StorefrontError};
use thiserror::Error;

use crate::config::CliConfig;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// No user given on the command line and none logged in.
    #[error("No user specified and not logged in (pass --user or run `bookstand login`)")]
    NoUser,

    /// Backend returned nothing for a lookup.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Which application a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum App {
    Storefront,
    Admin,
}

/// Both applications, sharing one file-backed session.
pub struct Context {
    pub storefront: Storefront,
    pub admin: Admin,
}

impl Context {
    /// Open the session file and build both facades over it.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the session file is unreadable or a client
    /// cannot be built.
    pub fn new(config: &CliConfig) -> Result<Self, CommandError> {
        let session = Session::new(FileSessionStore::open(&config.session_file)?);
        let storefront = Storefront::new(&config.client, session.clone())?;
        let admin = Admin::new(&config.client, session)?;

        for kind in AdminEventKind::ALL {
            admin.events().subscribe(kind, log_event);
        }

        Ok(Self { storefront, admin })
    }

    pub fn session(&self) -> &Session {
        self.storefront.session()
    }

    /// `explicit` if given, otherwise the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::NoUser` when neither is available.
    pub fn user_or_current(&self, explicit: Option<UserId>) -> Result<UserId, CommandError> {
        explicit
            .or_else(|| self.session().user_id())
            .ok_or(CommandError::NoUser)
    }
}

#[allow(clippy::unnecessary_wraps)]
fn log_event(event: &AdminEvent) -> Result<(), bookstand_client::ListenerError> {
    match event {
        AdminEvent::NewBookAdded { title, book } => match book {
            Some(book) => tracing::info!(book_id = %book.id, %title, "Catalog: new book added"),
            None => tracing::info!(%title, "Catalog: new book added"),
        },
        AdminEvent::BookRemoved(id) => tracing::info!(book_id = %id, "Catalog: book removed"),
        AdminEvent::LowStockAlert(report) => {
            for book in &report.books {
                tracing::warn!(book_id = %book.id, title = %book.title, stock = book.stock, "Catalog: low stock");
            }
        }
    }
    Ok(())
}
