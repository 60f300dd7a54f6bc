//! Bookstand Core - Shared domain types.
//!
//! This crate provides the records exchanged with the bookstore backend and
//! used by every Bookstand component:
//! - `storefront` - Customer-facing shop client
//! - `admin` - Back-office client (admin role only)
//! - `cli` - Command-line front end driving both
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no session
//! handling. The backend is authoritative for persistence and identity, so
//! every entity here is a plain serializable record.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, statuses and timestamp helpers
//! - [`book`], [`order`], [`user`], [`cart`], [`address`] - Backend entities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod book;
pub mod cart;
pub mod order;
pub mod types;
pub mod user;

pub use address::Address;
pub use book::{Book, BooksCount, Category, LowStockBook, LowStockReport};
pub use cart::{Cart, CartItem};
pub use order::{CreatedOrder, Order, OrderItem, OrderList};
pub use types::*;
pub use user::{LoginResponse, User, UserProfile, UserStats, UserStatusCheck, UsersCount};
