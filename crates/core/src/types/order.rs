//! Orders, invoices and payment transactions.
//!
//! Orders are composed server-side from a transaction, an invoice (with a
//! cart snapshot) and delivery info. The status transition table here
//! mirrors the backend's rules so management screens only ever offer legal
//! transitions; the backend re-validates every update.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::delivery::DeliveryInfo;
use super::id::{CartId, InvoiceId, OrderId};
use super::product::Product;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The statuses this one may legally move to.
    #[must_use]
    pub const fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered | Self::Rejected | Self::Cancelled => &[],
        }
    }

    /// Whether `next` is a legal transition from this status.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Terminal statuses cannot move anywhere.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A payment transaction as recorded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Gateway-assigned transaction number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_no: Option<String>,
    pub bank_code: String,
    pub card_type: String,
    pub amount: Decimal,
    pub pay_date: NaiveDateTime,
    #[serde(default)]
    pub error_message: String,
}

/// One line of an order's cart snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCartItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub quantity: u32,
    pub product: Product,
}

/// The cart snapshot frozen into an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<CartId>,
    #[serde(rename = "totalProductPriceBeforeVAT")]
    pub total_product_price_before_vat: Decimal,
    pub items: Vec<OrderCartItem>,
}

/// An invoice: cart snapshot plus the money breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<InvoiceId>,
    pub cart: OrderCart,
    #[serde(rename = "totalProductPriceAfterVAT")]
    pub total_product_price_after_vat: Decimal,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
}

/// A complete order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub transaction: Transaction,
    pub invoice: Invoice,
    pub delivery_info: DeliveryInfo,
    pub status: OrderStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use OrderStatus::{Approved, Cancelled, Delivered, Pending, Rejected, Shipped};

        assert_eq!(Pending.allowed_transitions(), [Approved, Rejected]);
        assert_eq!(Approved.allowed_transitions(), [Shipped, Cancelled]);
        assert_eq!(Shipped.allowed_transitions(), [Delivered]);
        assert!(Delivered.allowed_transitions().is_empty());
        assert!(Rejected.allowed_transitions().is_empty());
        assert!(Cancelled.allowed_transitions().is_empty());
    }

    #[test]
    fn test_shipped_only_offers_delivered() {
        // A shipped order must never offer approval, rejection or cancellation
        for status in OrderStatus::ALL {
            let legal = OrderStatus::Shipped.can_transition_to(status);
            assert_eq!(legal, status == OrderStatus::Delivered, "{status:?}");
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Approved.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }
}
