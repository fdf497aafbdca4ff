//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use aims_core::{CurrencyCode, Price, Product, ProductId};

use crate::backend::products::ProductSearch;
use crate::error::Result;
use crate::state::AppState;

/// Product summary for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub media_type: String,
    pub price: Decimal,
    pub price_display: String,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub rush_order_eligible: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            media_type: product.media_type().label().to_string(),
            price: product.current_price,
            price_display: Price::new(product.current_price, CurrencyCode::VND).display(),
            in_stock: product.quantity > 0,
            image_url: product.image_url.clone(),
            rush_order_eligible: product.rush_order_eligible,
        }
    }
}

/// A page of product summaries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub products: Vec<ProductView>,
    pub total: i64,
}

/// Catalog search query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub media_type: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

/// Catalog search.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductListView>> {
    let search = ProductSearch {
        page: query.page,
        size: query.size,
        search: query.search,
        category: query.category,
        media_type: query.media_type,
        min_price: query.min_price,
        max_price: query.max_price,
        sort_by: query.sort_by,
        sort_direction: query.sort_direction,
    };

    let page = state.backend().search_products(&search).await?;

    Ok(Json(ProductListView {
        products: page.data.iter().map(ProductView::from).collect(),
        total: page.total,
    }))
}

/// Product detail: the full backend product, media attributes included.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let product = state.backend().product(ProductId::new(id)).await?;
    Ok(Json(product))
}
