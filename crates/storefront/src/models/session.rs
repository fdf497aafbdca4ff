//! Session-stored types.
//!
//! The session is the server-side replacement for the browser storage the
//! checkout flow needs across full navigations (the payment gateway
//! redirects the customer away and back).

use serde::{Deserialize, Serialize};

use aims_core::{Email, Role, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
/// Roles here only shape what the UI offers; the backend authorizes from
/// the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub roles: Vec<Role>,
}

/// Session keys.
pub mod keys {
    /// Bearer token for backend calls.
    pub const TOKEN: &str = "token";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "user";

    /// The shopping cart.
    pub const CART: &str = "cart";

    /// The in-flight checkout session (delivery info + invoice draft).
    pub const CHECKOUT: &str = "checkout";
}
