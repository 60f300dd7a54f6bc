//! Bookstand Storefront library.
//!
//! The customer-facing application: browsing the catalog, a cart, checkout
//! and order history. [`Storefront`] binds a session to an API client and the
//! storefront route table; views (or the command line) drive it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod error;
pub mod route;

pub use app::Storefront;
pub use error::StorefrontError;
pub use route::StorefrontRoute;
