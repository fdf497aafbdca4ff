//! AIMS Core - Shared domain types.
//!
//! This crate provides common types used across all AIMS components:
//! - `storefront` - Public-facing media store
//! - `admin` - Internal administration panel
//! - `cli` - Command-line management tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no web
//! framework. All pricing, inventory and authorization decisions belong to
//! the AIMS backend; the types here model what the client layer needs to
//! hold and display.
//!
//! # Modules
//!
//! - [`types`] - IDs, money, media kinds, products, cart, orders, users

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
