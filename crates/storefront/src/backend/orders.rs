//! Checkout completion and order reads.
//!
//! The order is created server-side after the payment gateway confirms.
//! Request shapes mirror the backend's checkout DTOs: a cart snapshot is
//! reduced to `(productId, quantity)` lines and temporary client-side ids
//! are never sent.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use aims_core::{DeliveryInfo, Order, OrderId, OrderStatus};

use super::cart::CartLine;
use super::{BackendClient, BackendError};

/// Gateway transaction details recorded with the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub transaction_id: String,
    pub bank_code: String,
    pub amount: Decimal,
    pub card_type: String,
    pub pay_date: NaiveDateTime,
    #[serde(default)]
    pub error_message: String,
}

/// Cart snapshot sent with a checkout request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(rename = "totalProductPriceBeforeVAT")]
    pub total_product_price_before_vat: Decimal,
    pub items: Vec<CartLine>,
}

/// Invoice figures sent with a checkout request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    pub cart: CartSnapshot,
    #[serde(rename = "totalProductPriceBeforeVAT")]
    pub total_product_price_before_vat: Decimal,
    #[serde(rename = "totalProductPriceAfterVAT")]
    pub total_product_price_after_vat: Decimal,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
}

/// Standard checkout completion request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub delivery_info: DeliveryInfo,
    pub invoice_data: InvoiceData,
    pub transaction_data: TransactionData,
    pub status: OrderStatus,
}

/// Rush checkout completion request.
///
/// The rush endpoint takes a differently-shaped transaction payload and the
/// resolved delivery window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RushCheckoutRequest {
    pub delivery_info: DeliveryInfo,
    pub invoice_request: InvoiceData,
    pub transaction_request: RushTransactionData,
    pub status: OrderStatus,
    pub delivery_time: NaiveDateTime,
    pub delivery_instruction: String,
}

/// Transaction payload for the rush checkout endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RushTransactionData {
    pub transaction_id: String,
    pub transaction_no: String,
    pub amount: Decimal,
    pub pay_date: NaiveDateTime,
    pub gateway: String,
    pub transaction_status: String,
    pub additional_params: RushTransactionParams,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RushTransactionParams {
    pub bank_code: String,
    pub card_type: String,
    pub error_message: String,
}

impl RushTransactionData {
    /// Build the rush payload from standard transaction data.
    #[must_use]
    pub fn from_transaction(tx: &TransactionData) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            transaction_no: tx.transaction_id.clone(),
            amount: tx.amount,
            pay_date: tx.pay_date,
            gateway: tx.bank_code.clone(),
            transaction_status: "SUCCESS".to_owned(),
            additional_params: RushTransactionParams {
                bank_code: tx.bank_code.clone(),
                card_type: tx.card_type.clone(),
                error_message: tx.error_message.clone(),
            },
        }
    }
}

impl BackendClient {
    /// Complete a standard checkout: create the order from the verified
    /// transaction, invoice snapshot and delivery info.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects the
    /// order (stock changed, invalid snapshot).
    #[instrument(skip(self, request))]
    pub async fn complete_checkout(
        &self,
        request: &CheckoutRequest,
        token: Option<&str>,
    ) -> Result<Order, BackendError> {
        self.post_json("/orders/checkout/create-order", token, request)
            .await
    }

    /// Complete a rush checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the backend rejects the
    /// order.
    #[instrument(skip(self, request))]
    pub async fn complete_rush_checkout(
        &self,
        request: &RushCheckoutRequest,
        token: Option<&str>,
    ) -> Result<Order, BackendError> {
        self.post_json("/rush-orders", token, request).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the API request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId, token: Option<&str>) -> Result<Order, BackendError> {
        self.get_json(&format!("/orders/{id}"), token, &[]).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aims_core::ProductId;
    use chrono::NaiveDate;

    #[test]
    fn test_checkout_request_wire_shape() {
        let request = CheckoutRequest {
            delivery_info: DeliveryInfo {
                id: None,
                recipient_name: "Nguyen Van A".to_owned(),
                email: "a@example.com".to_owned(),
                phone_number: "0912345678".to_owned(),
                province: "Hanoi".to_owned(),
                district: Some("Hoan Kiem".to_owned()),
                delivery_address: "1 Trang Tien".to_owned(),
                is_rush_order: false,
                rush_delivery_time: None,
                rush_delivery_instructions: None,
                delivery_fee: Decimal::from(15_000),
            },
            invoice_data: InvoiceData {
                cart: CartSnapshot {
                    total_product_price_before_vat: Decimal::from(200_000),
                    items: vec![CartLine {
                        product_id: ProductId::new(12),
                        quantity: 2,
                    }],
                },
                total_product_price_before_vat: Decimal::from(200_000),
                total_product_price_after_vat: Decimal::from(220_000),
                delivery_fee: Decimal::from(15_000),
                total_amount: Decimal::from(235_000),
            },
            transaction_data: TransactionData {
                transaction_id: "14422574".to_owned(),
                bank_code: "NCB".to_owned(),
                amount: Decimal::from(235_000),
                card_type: "NCB".to_owned(),
                pay_date: NaiveDate::from_ymd_opt(2024, 6, 1)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
                error_message: String::new(),
            },
            status: OrderStatus::Pending,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["invoiceData"]["totalProductPriceAfterVAT"], "220000");
        assert_eq!(json["invoiceData"]["cart"]["items"][0]["productId"], 12);
        // No client-side ids in the payload
        assert!(json["deliveryInfo"].get("id").is_none());
        // Dates serialize without a timezone suffix
        assert_eq!(
            json["transactionData"]["payDate"],
            "2024-06-01T10:30:00"
        );
    }

    #[test]
    fn test_rush_transaction_from_standard() {
        let tx = TransactionData {
            transaction_id: "987".to_owned(),
            bank_code: "VNPAY".to_owned(),
            amount: Decimal::from(100_000),
            card_type: "ATM".to_owned(),
            pay_date: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            error_message: String::new(),
        };

        let rush = RushTransactionData::from_transaction(&tx);
        assert_eq!(rush.transaction_no, "987");
        assert_eq!(rush.gateway, "VNPAY");
        assert_eq!(rush.transaction_status, "SUCCESS");
        assert_eq!(rush.additional_params.card_type, "ATM");
    }
}
