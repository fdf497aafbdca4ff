//! Home page: a random selection from the catalog.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::routes::products::{ProductListView, ProductView};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Home page products.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<Json<ProductListView>> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let result = state.backend().random_products(page, limit).await?;

    Ok(Json(ProductListView {
        products: result.data.iter().map(ProductView::from).collect(),
        total: result.total,
    }))
}
