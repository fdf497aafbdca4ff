//! The checkout session.
//!
//! Checkout spans a full navigation away from the site (the payment
//! gateway redirect), so its intermediate state must survive page loads.
//! It is held as one explicit, schema'd value in the server-side session
//! with a hard expiry - never in client-readable storage, and never
//! trusted for the final payable amount (the payment step re-prices the
//! live cart first).

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aims_core::{Cart, DeliveryInfo, VAT_RATE};

/// How long a checkout session stays valid after the delivery step.
const CHECKOUT_TTL_MINUTES: i64 = 30;

/// Draft invoice figures carried from the delivery step to payment.
///
/// Display-only until the payment step refreshes them from the backend's
/// authoritative calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(rename = "totalProductPriceBeforeVAT")]
    pub total_product_price_before_vat: Decimal,
    #[serde(rename = "totalProductPriceAfterVAT")]
    pub total_product_price_after_vat: Decimal,
    pub delivery_fee: Decimal,
    pub total_amount: Decimal,
}

impl InvoiceDraft {
    /// Build a draft from the session cart and a delivery fee quote.
    #[must_use]
    pub fn from_cart(cart: &Cart, delivery_fee: Decimal) -> Self {
        let before_vat = cart.subtotal;
        let after_vat = before_vat + before_vat * VAT_RATE;
        Self {
            total_product_price_before_vat: before_vat,
            total_product_price_after_vat: after_vat,
            delivery_fee,
            total_amount: after_vat + delivery_fee,
        }
    }
}

/// One in-flight checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Client-generated reference echoed through the gateway redirect.
    pub order_ref: String,
    pub delivery: DeliveryInfo,
    pub invoice: InvoiceDraft,
    pub created_at: DateTime<Utc>,
    /// Set once the order exists server-side; guards against a reload of
    /// the confirmation page creating a second order.
    #[serde(default)]
    pub created_order: Option<aims_core::OrderId>,
}

impl CheckoutSession {
    /// Start a checkout session.
    #[must_use]
    pub fn new(delivery: DeliveryInfo, invoice: InvoiceDraft, now: DateTime<Utc>) -> Self {
        Self {
            order_ref: Uuid::new_v4().simple().to_string(),
            delivery,
            invoice,
            created_at: now,
            created_order: None,
        }
    }

    /// Whether the session has outlived its TTL.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > Duration::minutes(CHECKOUT_TTL_MINUTES)
    }
}

/// Provisional delivery fee by province, in VND.
///
/// A quote for the delivery screen; the backend's cart calculation is the
/// authoritative figure at payment time.
#[must_use]
pub fn delivery_fee_quote(province: &str, is_rush_order: bool) -> Decimal {
    let province = province.to_lowercase();

    let base = if province.contains("hanoi") || province.contains("hà nội") {
        15_000
    } else if province.contains("ho chi minh") || province.contains("hồ chí minh") {
        20_000
    } else {
        30_000
    };

    let rush_surcharge = if is_rush_order { 50_000 } else { 0 };

    Decimal::from(base + rush_surcharge)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn delivery() -> DeliveryInfo {
        DeliveryInfo {
            id: None,
            recipient_name: "Nguyen Van A".to_owned(),
            email: "a@example.com".to_owned(),
            phone_number: "0912345678".to_owned(),
            province: "Hanoi".to_owned(),
            district: None,
            delivery_address: "1 Trang Tien".to_owned(),
            is_rush_order: false,
            rush_delivery_time: None,
            rush_delivery_instructions: None,
            delivery_fee: Decimal::from(15_000),
        }
    }

    fn draft() -> InvoiceDraft {
        InvoiceDraft {
            total_product_price_before_vat: Decimal::from(200_000),
            total_product_price_after_vat: Decimal::from(220_000),
            delivery_fee: Decimal::from(15_000),
            total_amount: Decimal::from(235_000),
        }
    }

    #[test]
    fn test_delivery_fee_table() {
        assert_eq!(delivery_fee_quote("Hanoi", false), Decimal::from(15_000));
        assert_eq!(delivery_fee_quote("Hà Nội", false), Decimal::from(15_000));
        assert_eq!(
            delivery_fee_quote("Ho Chi Minh City", false),
            Decimal::from(20_000)
        );
        assert_eq!(delivery_fee_quote("Da Nang", false), Decimal::from(30_000));
    }

    #[test]
    fn test_rush_surcharge() {
        assert_eq!(delivery_fee_quote("Hanoi", true), Decimal::from(65_000));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let session = CheckoutSession::new(delivery(), draft(), now);

        assert!(!session.is_expired(now));
        assert!(!session.is_expired(now + Duration::minutes(30)));
        assert!(session.is_expired(now + Duration::minutes(30) + Duration::seconds(1)));
    }

    #[test]
    fn test_order_refs_are_unique() {
        let now = Utc::now();
        let a = CheckoutSession::new(delivery(), draft(), now);
        let b = CheckoutSession::new(delivery(), draft(), now);
        assert_ne!(a.order_ref, b.order_ref);
    }

    #[test]
    fn test_invoice_draft_from_cart_applies_vat_and_fee() {
        let mut cart = Cart::new();
        // subtotal 0 for an empty cart still shapes correctly
        cart.clear();
        let draft = InvoiceDraft::from_cart(&cart, Decimal::from(30_000));
        assert_eq!(draft.total_product_price_after_vat, Decimal::ZERO);
        assert_eq!(draft.total_amount, Decimal::from(30_000));
    }
}
