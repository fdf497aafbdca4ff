//! Cart pricing and inventory checks.
//!
//! The session cart computes display totals locally; these endpoints are
//! the authoritative re-pricing (delivery fee included) and the stock
//! check. The payment step always calls [`BackendClient::calculate_cart`]
//! on the live cart immediately before redirecting - a session-cached total
//! is never trusted for the payable amount.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use aims_core::{Cart, ProductId};

use super::{BackendClient, BackendError};

/// One cart line in request form: just the id and the quantity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartLine {
    /// Collapse a full session cart into request lines.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Vec<Self> {
        cart.items
            .iter()
            .map(|item| Self {
                product_id: item.product.id,
                quantity: item.quantity,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateCartRequest<'a> {
    items: &'a [CartLine],
    is_rush_delivery: bool,
    province: &'a str,
}

/// Authoritative cart pricing from the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCalculation {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    #[serde(default = "default_true")]
    pub all_items_available: bool,
    #[serde(default)]
    pub out_of_stock_items: Vec<StockShortage>,
}

/// Inventory check result.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCheck {
    pub all_available: bool,
    #[serde(default)]
    pub out_of_stock_products: Vec<StockShortage>,
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

const fn default_true() -> bool {
    true
}

impl BackendClient {
    /// Re-price a cart: subtotal, VAT, delivery fee and total.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects the
    /// cart (unknown products, empty cart).
    #[instrument(skip(self, items))]
    pub async fn calculate_cart(
        &self,
        items: &[CartLine],
        is_rush_delivery: bool,
        province: &str,
        token: Option<&str>,
    ) -> Result<CartCalculation, BackendError> {
        self.post_json(
            "/carts/calculate",
            token,
            &CalculateCartRequest {
                items,
                is_rush_delivery,
                province,
            },
        )
        .await
    }

    /// Check stock availability for a set of cart lines.
    ///
    /// Read-only: the session cart is left untouched whatever the result.
    /// The backend reports shortages in the response body whether it
    /// answers 200 or 400, so both decode to an [`InventoryCheck`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails for any other reason.
    #[instrument(skip(self, items))]
    pub async fn check_inventory(
        &self,
        items: &[CartLine],
    ) -> Result<InventoryCheck, BackendError> {
        #[derive(Serialize)]
        struct Request<'a> {
            items: &'a [CartLine],
        }

        let response = self
            .raw_client()
            .post(self.api_url("/products/check-inventory"))
            .json(&Request { items })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

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
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_wire_shape() {
        let line = CartLine {
            product_id: ProductId::new(5),
            quantity: 3,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json, serde_json::json!({"productId": 5, "quantity": 3}));
    }

    #[test]
    fn test_calculation_defaults_to_available() {
        let calc: CartCalculation = serde_json::from_value(serde_json::json!({
            "subtotal": "200000",
            "tax": "20000",
            "deliveryFee": "15000",
            "total": "235000"
        }))
        .unwrap();

        assert!(calc.all_items_available);
        assert!(calc.out_of_stock_items.is_empty());
    }
}
