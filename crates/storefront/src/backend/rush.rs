//! Rush-order eligibility.
//!
//! Called only for Hanoi addresses - the province pre-filter lives in the
//! checkout routes and a non-Hanoi address never reaches this endpoint.
//! The backend checks both the address and every product in the cart.

use serde::Serialize;
use tracing::instrument;

use aims_core::DeliveryInfo;

use super::cart::CartLine;
use super::{BackendClient, BackendError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EligibilityRequest<'a> {
    #[serde(rename = "cartRequestDTO")]
    cart: CartPayload<'a>,
    #[serde(rename = "deliveryInfoDTO")]
    delivery_info: DeliveryPayload<'a>,
}

#[derive(Debug, Serialize)]
struct CartPayload<'a> {
    items: &'a [CartLine],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryPayload<'a> {
    delivery_address: &'a str,
    province: &'a str,
    phone_number: &'a str,
    recipient_name: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    district: Option<&'a str>,
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone)]
pub enum RushEligibility {
    Eligible,
    /// Backend said no; carries the reason to show inline.
    Ineligible(String),
}

impl BackendClient {
    /// Ask the backend whether this cart + address can be rush-delivered.
    ///
    /// A 400 response means "no" and is folded into
    /// [`RushEligibility::Ineligible`]; every other error propagates.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails for any reason other than
    /// an eligibility rejection.
    #[instrument(skip(self, items, delivery), fields(province = %delivery.province))]
    pub async fn check_rush_eligibility(
        &self,
        items: &[CartLine],
        delivery: &DeliveryInfo,
        token: Option<&str>,
    ) -> Result<RushEligibility, BackendError> {
        let request = EligibilityRequest {
            cart: CartPayload { items },
            delivery_info: DeliveryPayload {
                delivery_address: &delivery.delivery_address,
                province: &delivery.province,
                phone_number: &delivery.phone_number,
                recipient_name: &delivery.recipient_name,
                email: &delivery.email,
                district: delivery.district.as_deref(),
            },
        };

        let result: Result<serde_json::Value, BackendError> = self
            .post_json("/rush-orders/check-eligibility", token, &request)
            .await;

        match result {
            Ok(_) => Ok(RushEligibility::Eligible),
            Err(BackendError::Validation(reason)) => Ok(RushEligibility::Ineligible(reason)),
            Err(e) => Err(e),
        }
    }
}
