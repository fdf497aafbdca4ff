//! HTTP route handlers for the storefront.
//!
//! Handlers return JSON view models; the storefront is headless.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page products
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (pings the backend)
//!
//! # Products
//! GET  /products                 - Catalog search
//! GET  /products/{id}            - Product detail
//!
//! # Cart (session-backed)
//! GET  /cart                     - Cart contents
//! POST /cart/add                 - Add a product
//! POST /cart/update              - Set a line quantity
//! POST /cart/remove              - Remove a line
//! POST /cart/clear               - Empty the cart
//! GET  /cart/count               - Item count badge
//! POST /cart/check-inventory     - Stock check against the backend
//!
//! # Checkout
//! POST /checkout/delivery        - Submit delivery info, open a checkout session
//! POST /checkout/rush-eligibility - Rush-order toggle check
//! GET  /checkout/payment         - Payment summary
//! POST /checkout/payment         - Recompute amount, redirect to the gateway
//! GET  /checkout/confirmation    - Gateway return: verify, create the order
//!
//! # Orders
//! GET  /orders/{id}              - View one of the customer's orders
//!
//! # Auth
//! POST /auth/login               - Login against the backend
//! POST /auth/logout              - Clear the session
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route("/check-inventory", post(cart::check_inventory))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/delivery", post(checkout::submit_delivery))
        .route("/rush-eligibility", post(checkout::rush_eligibility))
        .route(
            "/payment",
            get(checkout::payment_summary).post(checkout::start_payment),
        )
        .route("/confirmation", get(checkout::confirmation))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
        // Order view (requires login)
        .route("/orders/{id}", get(orders::show))
        // Auth routes
        .nest("/auth", auth_routes())
}
