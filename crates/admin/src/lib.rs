//! Bookstand Admin library.
//!
//! The back-office application. Only accounts with the admin role may use
//! it: the route guard denies everyone else, and [`Admin::login`] refuses
//! non-admin credentials outright.
//!
//! Catalog changes made through [`Admin`] are announced on its
//! [`EventChannel`](bookstand_client::EventChannel) so other views can react
//! without polling.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod error;
pub mod events;
pub mod route;

pub use app::{Admin, DashboardSummary};
pub use error::AdminError;
pub use events::{AdminEvent, AdminEventKind};
pub use route::AdminRoute;
