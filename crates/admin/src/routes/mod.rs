//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (pings the backend)
//!
//! # Auth
//! POST /auth/login                   - Staff login
//! POST /auth/logout                  - Clear the session
//!
//! # Products
//! GET    /products                   - Paginated list/search
//! POST   /products                   - Create
//! PUT    /products/{id}              - Update
//! DELETE /products/{id}              - Delete (single)
//! POST   /products/bulk-delete       - Delete up to 10 at once
//! GET    /products/{id}/operations   - One product's operation history
//! GET    /products/operations        - Global operation history
//!
//! # Users
//! GET    /users                      - Paginated list/search
//! POST   /users                      - Create
//! PUT    /users/{id}                 - Update
//! DELETE /users/{id}                 - Delete
//! POST   /users/{id}/reset-password  - Trigger password reset
//!
//! # Orders
//! GET  /orders                       - Paginated list with filters
//! GET  /orders/{id}                  - Detail + allowed transitions
//! GET  /orders/{id}/stock-check      - Pre-approval shortage report
//! POST /orders/{id}/status           - Transition-checked status update
//! POST /orders/{id}/approve          - Stock-checked approval
//! POST /orders/{id}/reject           - Rejection
//! ```

pub mod auth;
pub mod history;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/bulk-delete", post(products::bulk_delete))
        .route("/operations", get(history::index))
        .route("/{id}", put(products::update).delete(products::delete))
        .route("/{id}/operations", get(history::for_product))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route("/{id}", put(users::update).delete(users::delete))
        .route("/{id}/reset-password", post(users::reset_password))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/stock-check", get(orders::stock_check))
        .route("/{id}/status", post(orders::update_status))
        .route("/{id}/approve", post(orders::approve))
        .route("/{id}/reject", post(orders::reject))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/users", user_routes())
        .nest("/orders", order_routes())
}
