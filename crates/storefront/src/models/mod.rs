//! Session-scoped models.

pub mod checkout;
pub mod session;

pub use checkout::{CheckoutSession, InvoiceDraft};
pub use session::{CurrentUser, keys as session_keys};
