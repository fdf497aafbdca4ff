//! Product management operations.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use aims_core::{CoverType, DiscType, MediaType, Product, ProductId, UserId};

use super::{AdminBackendClient, BackendError, Paginated};

/// Product list query.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub media_type: Option<String>,
}

impl ProductQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(media_type) = &self.media_type {
            pairs.push(("mediaType", media_type.clone()));
        }
        pairs
    }
}

/// Create/update payload for a product.
///
/// Flat on the wire: media-specific fields are optional and the backend
/// validates them against `media_type`. [`ProductDraft::validate`] runs the
/// same required-field checks first so the form gets field-level errors
/// without a round trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub media_type: Option<MediaType>,
    pub title: String,
    pub category: String,
    pub value: Decimal,
    pub current_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    pub barcode: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_entry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rush_order_eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    // Book fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_type: Option<CoverType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    // CD/LP fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracklist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,

    // DVD fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_type: Option<DiscType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// A recorded product operation (audit trail entry).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationHistory {
    pub id: i64,
    pub operation_type: OperationType,
    pub product_id: ProductId,
    pub product_name: String,
    pub user_id: UserId,
    pub user_name: String,
    pub timestamp: DateTime<Utc>,
    /// Per-field before/after snapshot, as the backend recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The kinds of product operation the backend records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Add,
    Update,
    Delete,
}

/// Operation history query.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub operation_type: Option<OperationType>,
    pub product_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl HistoryQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(op) = self.operation_type {
            let label = match op {
                OperationType::Add => "ADD",
                OperationType::Update => "UPDATE",
                OperationType::Delete => "DELETE",
            };
            pairs.push(("operationType", label.to_string()));
        }
        if let Some(id) = self.product_id {
            pairs.push(("productId", id.to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.to_string()));
        }
        pairs
    }
}

impl AdminBackendClient {
    /// List/search products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn products(
        &self,
        query: &ProductQuery,
        token: &str,
    ) -> Result<Paginated<Product>, BackendError> {
        self.get_json("/products/search", token, &query.query_pairs())
            .await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId, token: &str) -> Result<Product, BackendError> {
        self.get_json(&format!("/products/{id}"), token, &[]).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the
    /// draft (400 with a field-attributable message).
    #[instrument(skip(self, draft, token))]
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        token: &str,
    ) -> Result<Product, BackendError> {
        self.post_json("/products", token, draft).await
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the product is missing, or a
    /// concurrent edit is in progress (409).
    #[instrument(skip(self, draft, token), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        token: &str,
    ) -> Result<Product, BackendError> {
        self.put_json(&format!("/products/{id}"), token, draft).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId, token: &str) -> Result<(), BackendError> {
        self.delete_unit(&format!("/products/{id}"), token).await
    }

    /// Delete several products in one call.
    ///
    /// The route-level cap (10 ids) has already been applied; this is the
    /// raw backend call.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(count = ids.len()))]
    pub async fn delete_products(
        &self,
        ids: &[ProductId],
        token: &str,
    ) -> Result<(), BackendError> {
        #[derive(Serialize)]
        struct Request<'a> {
            ids: &'a [ProductId],
        }

        self.post_unit("/products/delete-multiple", token, &Request { ids })
            .await
    }

    /// Price/stock history for one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn product_operations(
        &self,
        id: ProductId,
        query: &HistoryQuery,
        token: &str,
    ) -> Result<Paginated<OperationHistory>, BackendError> {
        self.get_json(
            &format!("/products/{id}/operations"),
            token,
            &query.query_pairs(),
        )
        .await
    }

    /// The global product operation history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn operations(
        &self,
        query: &HistoryQuery,
        token: &str,
    ) -> Result<Paginated<OperationHistory>, BackendError> {
        self.get_json("/products/operations", token, &query.query_pairs())
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_serializes_flat_with_media_tag() {
        let draft = ProductDraft {
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
        };

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["mediaType"], "BOOK");
        assert_eq!(json["author"], "Viet Thanh Nguyen");
        // Fields for other media kinds are omitted, not null
        assert!(json.get("artist").is_none());
        assert!(json.get("discType").is_none());
    }

    #[test]
    fn test_history_query_pairs() {
        let query = HistoryQuery {
            page: Some(1),
            operation_type: Some(OperationType::Delete),
            product_id: Some(7),
            ..HistoryQuery::default()
        };
        let pairs = query.query_pairs();
        assert!(pairs.contains(&("operationType", "DELETE".to_owned())));
        assert!(pairs.contains(&("productId", "7".to_owned())));
    }
}
