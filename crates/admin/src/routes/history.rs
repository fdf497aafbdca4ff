//! Product operation history handlers.
//!
//! The backend records every catalog mutation (who, what, when); these
//! screens only read it.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use aims_core::ProductId;

use crate::backend::products::{HistoryQuery, OperationHistory, OperationType};
use crate::error::Result;
use crate::middleware::auth::RequireAdminAuth;
use crate::routes::products::require_token;
use crate::state::AppState;

/// A page of operation history entries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListView {
    pub operations: Vec<OperationHistory>,
    pub total: i64,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub operation_type: Option<OperationType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ListQuery {
    fn into_history_query(self, product_id: Option<i64>) -> HistoryQuery {
        HistoryQuery {
            page: self.page,
            limit: self.limit,
            operation_type: self.operation_type,
            product_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Global operation history.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<HistoryListView>> {
    let token = require_token(&session).await?;

    let page = state
        .backend()
        .operations(&query.into_history_query(None), &token)
        .await?;

    Ok(Json(HistoryListView {
        operations: page.data,
        total: page.total,
    }))
}

/// Operation history for one product.
#[instrument(skip(admin, state, session), fields(product_id = %id))]
pub async fn for_product(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<HistoryListView>> {
    let token = require_token(&session).await?;

    let page = state
        .backend()
        .product_operations(
            ProductId::new(id),
            &query.into_history_query(Some(id)),
            &token,
        )
        .await?;

    Ok(Json(HistoryListView {
        operations: page.data,
        total: page.total,
    }))
}
