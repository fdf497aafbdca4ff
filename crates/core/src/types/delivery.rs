//! Delivery information captured during checkout.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::DeliveryId;

/// Recipient and address details for one order.
///
/// Transient between the delivery and payment steps; the backend persists it
/// when the order is created. The rush fields are only meaningful when
/// `is_rush_order` is set, which in turn requires a Hanoi address and a
/// successful backend eligibility check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DeliveryId>,
    pub recipient_name: String,
    pub email: String,
    pub phone_number: String,
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub delivery_address: String,
    #[serde(default)]
    pub is_rush_order: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rush_delivery_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rush_delivery_instructions: Option<String>,
    #[serde(default)]
    pub delivery_fee: Decimal,
}

impl DeliveryInfo {
    /// Whether the address is in Hanoi, the only rush-eligible province.
    ///
    /// This is a pre-filter: a non-Hanoi address never reaches the backend
    /// eligibility endpoint.
    #[must_use]
    pub fn is_hanoi(&self) -> bool {
        let province = self.province.to_lowercase();
        province.contains("hanoi") || province.contains("hà nội") || province.contains("ha noi")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(province: &str) -> DeliveryInfo {
        DeliveryInfo {
            id: None,
            recipient_name: "Nguyen Van A".to_owned(),
            email: "a@example.com".to_owned(),
            phone_number: "0912345678".to_owned(),
            province: province.to_owned(),
            district: None,
            delivery_address: "1 Trang Tien".to_owned(),
            is_rush_order: false,
            rush_delivery_time: None,
            rush_delivery_instructions: None,
            delivery_fee: Decimal::ZERO,
        }
    }

    #[test]
    fn test_hanoi_detection() {
        assert!(info("Hanoi").is_hanoi());
        assert!(info("Hà Nội").is_hanoi());
        assert!(info("ha noi").is_hanoi());
        assert!(!info("Ho Chi Minh City").is_hanoi());
        assert!(!info("Da Nang").is_hanoi());
    }
}
