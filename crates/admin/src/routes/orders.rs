//! Order management handlers.
//!
//! Status updates are checked against the order's allowed transitions
//! before the backend is called, so the UI can only ever offer legal
//! moves (a SHIPPED order offers exactly DELIVERED). Approval runs a
//! stock check over every line first; any shortage blocks approval and
//! the response points at rejection instead.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use aims_core::{Order, OrderId, OrderStatus};

use crate::backend::orders::{OrderQuery, StockShortage};
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAdminAuth;
use crate::routes::products::require_token;
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// A page of orders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListView {
    pub orders: Vec<Order>,
    pub total: i64,
}

/// Order detail plus the transitions the UI may offer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub order: Order,
    pub allowed_transitions: Vec<OrderStatus>,
}

/// Pre-approval stock report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCheckView {
    pub can_approve: bool,
    pub shortages: Vec<StockShortage>,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Status update body.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: OrderStatus,
}

// =============================================================================
// Handlers
// =============================================================================

/// Paginated order list with filters.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<OrderListView>> {
    let token = require_token(&session).await?;

    let page = state
        .backend()
        .orders(
            &OrderQuery {
                page: query.page,
                limit: query.limit,
                search: query.search,
                status: query.status,
                start_date: query.start_date,
                end_date: query.end_date,
            },
            &token,
        )
        .await?;

    Ok(Json(OrderListView {
        orders: page.data,
        total: page.total,
    }))
}

/// Order detail.
#[instrument(skip(admin, state, session), fields(order_id = %id))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<OrderDetailView>> {
    let token = require_token(&session).await?;
    let order = state.backend().order(OrderId::new(id), &token).await?;

    Ok(Json(OrderDetailView {
        allowed_transitions: order.status.allowed_transitions().to_vec(),
        order,
    }))
}

/// Stock report for an order's lines.
#[instrument(skip(admin, state, session), fields(order_id = %id))]
pub async fn stock_check(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<StockCheckView>> {
    let token = require_token(&session).await?;
    let order = state.backend().order(OrderId::new(id), &token).await?;

    let report = run_stock_check(&state, &order, &token).await?;
    Ok(Json(report))
}

/// Transition-checked status update.
#[instrument(skip(admin, state, session, body), fields(order_id = %id))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Order>> {
    let token = require_token(&session).await?;
    let order = state.backend().order(OrderId::new(id), &token).await?;

    if !order.status.can_transition_to(body.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot move a {} order to {}; allowed: {}",
            order.status,
            body.status,
            format_transitions(order.status),
        )));
    }

    let updated = state
        .backend()
        .update_order_status(order.id, body.status, &token)
        .await?;

    Ok(Json(updated))
}

/// Stock-checked approval.
///
/// Runs the shortage report first; any shortage blocks the approval and
/// the response carries the lines at fault so the screen can offer
/// rejection instead.
#[instrument(skip(admin, state, session), fields(order_id = %id))]
pub async fn approve(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let token = require_token(&session).await?;
    let order = state.backend().order(OrderId::new(id), &token).await?;

    if !order.status.can_transition_to(OrderStatus::Approved) {
        return Err(AppError::BadRequest(format!(
            "Only pending orders can be approved (this one is {})",
            order.status
        )));
    }

    let report = run_stock_check(&state, &order, &token).await?;
    if !report.can_approve {
        return Err(AppError::BadRequest(format!(
            "Cannot approve: {} line(s) short on stock. Reject the order or wait for restock.",
            report.shortages.len()
        )));
    }

    let updated = state
        .backend()
        .update_order_status(order.id, OrderStatus::Approved, &token)
        .await?;

    Ok(Json(json!({ "message": "Order approved", "order": updated })))
}

/// Rejection.
#[instrument(skip(admin, state, session), fields(order_id = %id))]
pub async fn reject(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let token = require_token(&session).await?;
    let order = state.backend().order(OrderId::new(id), &token).await?;

    if !order.status.can_transition_to(OrderStatus::Rejected) {
        return Err(AppError::BadRequest(format!(
            "Only pending orders can be rejected (this one is {})",
            order.status
        )));
    }

    let updated = state
        .backend()
        .update_order_status(order.id, OrderStatus::Rejected, &token)
        .await?;

    Ok(Json(json!({ "message": "Order rejected", "order": updated })))
}

// =============================================================================
// Helpers
// =============================================================================

/// Query live stock for every line of the order and fold shortages.
async fn run_stock_check(
    state: &AppState,
    order: &Order,
    token: &str,
) -> Result<StockCheckView> {
    let lines: Vec<_> = order
        .invoice
        .cart
        .items
        .iter()
        .map(|item| (item.product.id, item.quantity))
        .collect();

    let check = state.backend().check_order_stock(&lines, token).await?;

    Ok(StockCheckView {
        can_approve: check.all_available && check.out_of_stock_products.is_empty(),
        shortages: check.out_of_stock_products,
    })
}

fn format_transitions(status: OrderStatus) -> String {
    let allowed = status.allowed_transitions();
    if allowed.is_empty() {
        "none (terminal status)".to_owned()
    } else {
        allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_transitions_terminal() {
        assert_eq!(
            format_transitions(OrderStatus::Delivered),
            "none (terminal status)"
        );
    }

    #[test]
    fn test_format_transitions_shipped_offers_only_delivered() {
        assert_eq!(format_transitions(OrderStatus::Shipped), "Delivered");
    }

    #[test]
    fn test_format_transitions_pending() {
        assert_eq!(format_transitions(OrderStatus::Pending), "Approved, Rejected");
    }
}
