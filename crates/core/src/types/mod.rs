//! Core types for the AIMS store.
//!
//! This module provides type-safe wrappers and domain models shared by the
//! storefront and admin binaries.

pub mod cart;
pub mod delivery;
pub mod email;
pub mod id;
pub mod media;
pub mod money;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, VAT_RATE};
pub use delivery::DeliveryInfo;
pub use email::{Email, EmailError};
pub use id::*;
pub use media::{CoverType, DiscType, MediaType};
pub use money::{CurrencyCode, Price};
pub use order::{Invoice, Order, OrderCart, OrderCartItem, OrderStatus, Transaction};
pub use product::{AlbumAttributes, MediaAttributes, Product};
pub use user::{Role, User};
