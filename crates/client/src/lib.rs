//! Bookstand Client - the contract between a Bookstand app and the backend.
//!
//! # Architecture
//!
//! - [`http::ApiClient`] is the single HTTP adapter: base URL, timeout,
//!   JSON content type, bearer token from the [`session::Session`], envelope
//!   unwrapping and error classification
//! - [`api`] holds one resource module per backend entity, each a thin typed
//!   wrapper mapping one operation to one HTTP call
//! - [`guard`] decides route transitions from the persisted session flags
//! - [`events`] is a typed in-process publish/subscribe channel
//!
//! The backend is authoritative for everything. Nothing here retries,
//! caches, or recovers: failures are logged and handed back unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstand_client::{ApiClient, ClientConfig, Session};
//!
//! let session = Session::in_memory();
//! let client = ApiClient::new(&ClientConfig::from_env()?, session)?;
//!
//! let books = client.books().all_books().await?;
//! client.carts().add_to_cart(user_id, books[0].id, 2).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod guard;
pub mod http;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use envelope::{Envelope, Payload, ShapeMismatch};
pub use error::{ApiError, ErrorKind};
pub use events::{Event, EventChannel, ListenerError, ListenerId, PublishError};
pub use guard::{Access, GuardDecision, NavigationGuard, RedirectReason, Route};
pub use http::{ApiClient, ApiRequest};
pub use session::{
    AuthState, FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore,
};
