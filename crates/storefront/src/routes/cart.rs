//! Cart route handlers.
//!
//! The cart lives in the session; every mutation goes through the
//! `aims_core::Cart` operations and is written back immediately, so the
//! stored totals are always consistent with the stored lines. No network
//! call sits on the mutation path - only the optional inventory check
//! talks to the backend, and a failure there leaves the cart untouched.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use aims_core::{Cart, CurrencyCode, Price, ProductId};

use crate::backend::cart::{CartLine, InventoryCheck};
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::routes::products::ProductView;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, defaulting to an empty cart.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save cart: {e}")))
}

/// Bearer token for the current session, if logged in.
pub(crate) async fn session_token(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::TOKEN)
        .await
        .ok()
        .flatten()
}

// =============================================================================
// View Models
// =============================================================================

/// One cart line for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product: ProductView,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub subtotal_display: String,
}

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub total_display: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartItemView {
                    product: ProductView::from(&item.product),
                    quantity: item.quantity,
                    subtotal: item.subtotal,
                    subtotal_display: Price::new(item.subtotal, CurrencyCode::VND).display(),
                })
                .collect(),
            subtotal: cart.subtotal,
            tax: cart.tax,
            total: cart.total,
            total_display: Price::new(cart.total, CurrencyCode::VND).display(),
            item_count: cart.total_quantity(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub product_id: i64,
    pub quantity: Option<u32>,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartBody {
    pub product_id: i64,
    pub quantity: u32,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartBody {
    pub product_id: i64,
}

/// Cart count badge.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// Resolves the product from the backend so the line carries a priced
/// snapshot; merges into an existing line when the product is already
/// present.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartBody>,
) -> Result<Json<CartView>> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".into()));
    }

    let product = state.backend().product(ProductId::new(body.product_id)).await?;

    let mut cart = load_cart(&session).await;
    cart.add(product, quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Set a line quantity.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(body): Json<UpdateCartBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.update(ProductId::new(body.product_id), body.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line. Removing an absent product is a no-op.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(body): Json<RemoveFromCartBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove(ProductId::new(body.product_id));
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCountView> {
    let cart = load_cart(&session).await;
    Json(CartCountView {
        count: cart.total_quantity(),
    })
}

/// Check stock for every line against the backend.
///
/// Read-only: whatever the outcome, the session cart is unchanged.
#[instrument(skip(state, session))]
pub async fn check_inventory(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<InventoryCheck>> {
    let cart = load_cart(&session).await;

    if cart.is_empty() {
        return Ok(Json(InventoryCheck {
            all_available: true,
            out_of_stock_products: Vec::new(),
        }));
    }

    let lines = CartLine::from_cart(&cart);
    let check = state.backend().check_inventory(&lines).await?;

    Ok(Json(check))
}
