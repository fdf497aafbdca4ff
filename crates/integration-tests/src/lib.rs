//! Integration test helpers for the AIMS headless storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a running stack
//! export AIMS_BACKEND_URL=http://localhost:8080
//! export STOREFRONT_BASE_URL=http://localhost:3000
//! export ADMIN_BASE_URL=http://localhost:3001
//!
//! cargo test -p aims-integration-tests -- --ignored
//! ```
//!
//! Tests that exercise live services carry `#[ignore]` with a reason;
//! everything else runs in a plain `cargo test`.

use reqwest::Client;

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A client with a cookie store, so the session (cart, checkout,
/// login) persists across requests the way a browser's would.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log a client into the admin panel.
///
/// # Errors
///
/// Returns an error if the login request fails.
pub async fn admin_login(
    client: &Client,
    email: &str,
    password: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
}
