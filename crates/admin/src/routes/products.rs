//! Product management handlers.
//!
//! Create/update run required-field validation locally first, then forward
//! to the backend; a backend 400 is attributed to a form field by message
//! matching (see `crate::validation`). Bulk delete is capped at 10 ids
//! and the cap is enforced before any network call.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use aims_core::{CurrencyCode, MediaType, Price, Product, ProductId};

use crate::backend::BackendError;
use crate::backend::products::{ProductDraft, ProductQuery};
use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAdminAuth, session_token};
use crate::state::AppState;
use crate::validation::attribute_product_error;

/// Most products deletable in one bulk request.
pub const BULK_DELETE_MAX: usize = 10;

// =============================================================================
// View Models
// =============================================================================

/// Product row for the management table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: ProductId,
    pub title: String,
    pub media_type: String,
    pub category: String,
    pub price: Decimal,
    pub price_display: String,
    pub quantity: i64,
    pub barcode: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            media_type: product.media_type().label().to_string(),
            category: product.category.clone(),
            price: product.current_price,
            price_display: Price::new(product.current_price, CurrencyCode::VND).display(),
            quantity: product.quantity,
            barcode: product.barcode.clone(),
        }
    }
}

/// A page of product rows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub products: Vec<ProductRow>,
    pub total: i64,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub media_type: Option<String>,
}

/// Bulk delete request body.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteBody {
    pub ids: Vec<i64>,
}

// =============================================================================
// Draft Validation
// =============================================================================

/// Required-field validation for a product draft.
///
/// Mirrors what the backend enforces so the form gets field errors without
/// a round trip; the backend remains the authority.
fn validate_draft(draft: &ProductDraft) -> std::result::Result<(), BTreeMap<&'static str, String>> {
    let Some(media_type) = draft.media_type else {
        return Err(BTreeMap::from([(
            "mediaType",
            "Media type is required".to_owned(),
        )]));
    };

    let mut errors = BTreeMap::new();

    if draft.title.trim().is_empty() {
        errors.insert("title", "Title is required".to_owned());
    }
    if draft.category.trim().is_empty() {
        errors.insert("category", "Category is required".to_owned());
    }
    if draft.barcode.trim().is_empty() {
        errors.insert("barcode", "Barcode is required".to_owned());
    }
    if draft.value <= Decimal::ZERO {
        errors.insert("value", "Value must be positive".to_owned());
    }
    if draft.current_price <= Decimal::ZERO {
        errors.insert("currentPrice", "Price must be positive".to_owned());
    }
    if draft.quantity < 0 {
        errors.insert("quantity", "Quantity cannot be negative".to_owned());
    }

    let missing = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());

    match media_type {
        MediaType::Book => {
            if missing(&draft.author) {
                errors.insert("author", "Author is required for books".to_owned());
            }
            if draft.cover_type.is_none() {
                errors.insert("coverType", "Cover type is required for books".to_owned());
            }
            if missing(&draft.publisher) {
                errors.insert("publisher", "Publisher is required for books".to_owned());
            }
        }
        MediaType::Cd | MediaType::Lp => {
            if missing(&draft.artist) {
                errors.insert("artist", "Artist is required".to_owned());
            }
            if missing(&draft.album) {
                errors.insert("album", "Album is required".to_owned());
            }
            if missing(&draft.record_label) {
                errors.insert("recordLabel", "Record label is required".to_owned());
            }
        }
        MediaType::Dvd => {
            if missing(&draft.director) {
                errors.insert("director", "Director is required for DVDs".to_owned());
            }
            if missing(&draft.runtime) {
                errors.insert("runtime", "Runtime is required for DVDs".to_owned());
            }
            if draft.disc_type.is_none() {
                errors.insert("discType", "Disc type is required for DVDs".to_owned());
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Shared write-path response shaping: field errors for a 400, everything
/// else through the normal error mapping.
fn field_error_response(errors: BTreeMap<&'static str, String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "Validation failed", "errors": errors })),
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Paginated product list/search.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListView>> {
    let token = require_token(&session).await?;

    let page = state
        .backend()
        .products(
            &ProductQuery {
                page: query.page,
                size: query.size,
                search: query.search,
                category: query.category,
                media_type: query.media_type,
            },
            &token,
        )
        .await?;

    Ok(Json(ProductListView {
        products: page.data.iter().map(ProductRow::from).collect(),
        total: page.total,
    }))
}

/// Create a product.
#[instrument(skip(admin, state, session, draft))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Json(draft): Json<ProductDraft>,
) -> Result<Response> {
    if !admin.can_manage_products() {
        return Err(AppError::Unauthorized(
            "Product management requires a product manager role".to_owned(),
        ));
    }

    if let Err(errors) = validate_draft(&draft) {
        return Ok(field_error_response(errors));
    }

    let token = require_token(&session).await?;
    match state.backend().create_product(&draft, &token).await {
        Ok(product) => Ok(Json(product).into_response()),
        Err(BackendError::Validation(message)) => {
            Ok(field_error_response(attribute_product_error(&message)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a product.
#[instrument(skip(admin, state, session, draft), fields(product_id = %id))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Json(draft): Json<ProductDraft>,
) -> Result<Response> {
    if !admin.can_manage_products() {
        return Err(AppError::Unauthorized(
            "Product management requires a product manager role".to_owned(),
        ));
    }

    if let Err(errors) = validate_draft(&draft) {
        return Ok(field_error_response(errors));
    }

    let token = require_token(&session).await?;
    match state
        .backend()
        .update_product(ProductId::new(id), &draft, &token)
        .await
    {
        Ok(product) => Ok(Json(product).into_response()),
        Err(BackendError::Validation(message)) => {
            Ok(field_error_response(attribute_product_error(&message)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one product.
#[instrument(skip(admin, state, session), fields(product_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    if !admin.can_manage_products() {
        return Err(AppError::Unauthorized(
            "Product management requires a product manager role".to_owned(),
        ));
    }

    let token = require_token(&session).await?;
    state
        .backend()
        .delete_product(ProductId::new(id), &token)
        .await?;

    Ok(Json(json!({ "message": "Product deleted" })))
}

/// Delete up to [`BULK_DELETE_MAX`] products at once.
///
/// The cap is checked before any network call.
#[instrument(skip(admin, state, session), fields(count = body.ids.len()))]
pub async fn bulk_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<BulkDeleteBody>,
) -> Result<Json<serde_json::Value>> {
    if !admin.can_manage_products() {
        return Err(AppError::Unauthorized(
            "Product management requires a product manager role".to_owned(),
        ));
    }

    if body.ids.is_empty() {
        return Err(AppError::BadRequest("No products selected".to_owned()));
    }
    if body.ids.len() > BULK_DELETE_MAX {
        return Err(AppError::BadRequest(format!(
            "At most {BULK_DELETE_MAX} products can be deleted at once (got {})",
            body.ids.len()
        )));
    }

    let ids: Vec<ProductId> = body.ids.iter().copied().map(ProductId::new).collect();
    let token = require_token(&session).await?;
    state.backend().delete_products(&ids, &token).await?;

    Ok(Json(json!({
        "message": format!("{} products deleted", ids.len())
    })))
}

/// Bearer token or 401.
pub(crate) async fn require_token(session: &Session) -> Result<String> {
    session_token(session)
        .await
        .ok_or_else(|| AppError::Unauthorized("Session has no token".to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aims_core::CoverType;

    fn book_draft() -> ProductDraft {
        ProductDraft {
            media_type: Some(MediaType::Book),
            title: "The Sympathizer".to_owned(),
            category: "Fiction".to_owned(),
            value: Decimal::from(180_000),
            current_price: Decimal::from(200_000),
            barcode: "8935036612345".to_owned(),
            quantity: 30,
            author: Some("Viet Thanh Nguyen".to_owned()),
            cover_type: Some(CoverType::Paperback),
            publisher: Some("Grove Press".to_owned()),
            ..ProductDraft::default()
        }
    }

    #[test]
    fn test_valid_book_draft_passes() {
        assert!(validate_draft(&book_draft()).is_ok());
    }

    #[test]
    fn test_missing_media_type_short_circuits() {
        let mut draft = book_draft();
        draft.media_type = None;
        let errors = validate_draft(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("mediaType"));
    }

    #[test]
    fn test_book_requires_author_and_cover() {
        let mut draft = book_draft();
        draft.author = None;
        draft.cover_type = None;
        let errors = validate_draft(&draft).unwrap_err();
        assert!(errors.contains_key("author"));
        assert!(errors.contains_key("coverType"));
    }

    #[test]
    fn test_album_media_requires_artist_fields() {
        let mut draft = book_draft();
        draft.media_type = Some(MediaType::Lp);
        let errors = validate_draft(&draft).unwrap_err();
        assert!(errors.contains_key("artist"));
        assert!(errors.contains_key("album"));
        assert!(errors.contains_key("recordLabel"));
    }

    #[test]
    fn test_nonpositive_prices_rejected() {
        let mut draft = book_draft();
        draft.current_price = Decimal::ZERO;
        draft.value = Decimal::from(-1);
        let errors = validate_draft(&draft).unwrap_err();
        assert!(errors.contains_key("currentPrice"));
        assert!(errors.contains_key("value"));
    }

    #[test]
    fn test_bulk_delete_cap_is_ten() {
        assert_eq!(BULK_DELETE_MAX, 10);
    }
}
