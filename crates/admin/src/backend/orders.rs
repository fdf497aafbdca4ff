//! Order management operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use aims_core::{Order, OrderId, OrderStatus, ProductId};

use super::{AdminBackendClient, BackendError, Paginated};

/// Order list query.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl OrderQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = self.status
            && let Ok(serde_json::Value::String(wire)) = serde_json::to_value(status)
        {
            pairs.push(("status", wire));
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

/// One line the warehouse cannot fully satisfy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockShortage {
    pub product_id: ProductId,
    pub title: String,
    pub available: i64,
    pub requested: i64,
    #[serde(default)]
    pub message: String,
}

/// Inventory check result for an order's lines.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCheck {
    pub all_available: bool,
    #[serde(default)]
    pub out_of_stock_products: Vec<StockShortage>,
}

impl AdminBackendClient {
    /// List/search orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn orders(
        &self,
        query: &OrderQuery,
        token: &str,
    ) -> Result<Paginated<Order>, BackendError> {
        self.get_json("/orders", token, &query.query_pairs()).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId, token: &str) -> Result<Order, BackendError> {
        self.get_json(&format!("/orders/{id}"), token, &[]).await
    }

    /// Update an order's status.
    ///
    /// The caller has already checked the transition against the allowed
    /// table; the backend enforces it again.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the transition is illegal
    /// (400) or a concurrent update is in progress (409).
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        token: &str,
    ) -> Result<Order, BackendError> {
        #[derive(Serialize)]
        struct Request {
            status: OrderStatus,
        }

        self.patch_json(&format!("/orders/{id}/status"), token, &Request { status })
            .await
    }

    /// Check current stock for a set of order lines.
    ///
    /// Used before approval: any shortage blocks the transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than a
    /// shortage report (which arrives in the body of a 200 or a 400).
    #[instrument(skip(self, lines, token))]
    pub async fn check_order_stock(
        &self,
        lines: &[(ProductId, u32)],
        token: &str,
    ) -> Result<InventoryCheck, BackendError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Item {
            product_id: ProductId,
            quantity: u32,
        }
        #[derive(Serialize)]
        struct Request {
            items: Vec<Item>,
        }

        let request = Request {
            items: lines
                .iter()
                .map(|&(product_id, quantity)| Item {
                    product_id,
                    quantity,
                })
                .collect(),
        };

        let response = self
            .inner
            .client
            .post(self.api_url("/products/check-inventory"))
            .json(&request)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // Shortage details ride in the body whether the backend answers
        // 200 or 400
        if status.is_success() || status == reqwest::StatusCode::BAD_REQUEST {
            return serde_json::from_str(&text).map_err(BackendError::Parse);
        }

        match super::classify_error(status, &text) {
            Some(err) => Err(err),
            None => serde_json::from_str(&text).map_err(BackendError::Parse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_query_status_rendering() {
        let query = OrderQuery {
            status: Some(OrderStatus::Shipped),
            ..OrderQuery::default()
        };
        assert!(query.query_pairs().contains(&("status", "SHIPPED".to_owned())));
    }
}
