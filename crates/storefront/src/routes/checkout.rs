//! Checkout pipeline handlers.
//!
//! The flow is: delivery info -> (optional rush-eligibility check) ->
//! payment redirect -> gateway return confirmation. Intermediate state is
//! one [`CheckoutSession`] value in the server-side session, because the
//! gateway redirect destroys any in-memory state.
//!
//! The payable amount is always recomputed from the live cart by the
//! backend immediately before the redirect; nothing cached client- or
//! session-side is trusted for money.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use aims_core::{DeliveryInfo, Order, OrderStatus};

use crate::backend::cart::CartLine;
use crate::backend::orders::{
    CartSnapshot, CheckoutRequest, InvoiceData, RushCheckoutRequest, RushTransactionData,
};
use crate::backend::rush::RushEligibility;
use crate::error::{AppError, Result};
use crate::gateway::GatewayReturn;
use crate::models::{CheckoutSession, InvoiceDraft, session_keys};
use crate::routes::cart::{load_cart, save_cart, session_token};
use crate::state::AppState;

/// Inline message for the pre-filtered rush rejection.
const RUSH_HANOI_ONLY: &str = "Rush delivery is only available for addresses within Hanoi.";

// =============================================================================
// Forms & Validation
// =============================================================================

/// Delivery information form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryForm {
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub is_rush_order: bool,
    /// "HH:MM", only meaningful for rush orders.
    #[serde(default)]
    pub rush_delivery_time: Option<String>,
    #[serde(default)]
    pub rush_delivery_instructions: Option<String>,
}

impl DeliveryForm {
    /// Field-level validation, mirroring what the backend will enforce.
    ///
    /// # Errors
    ///
    /// Returns a field -> message map when any field is invalid.
    pub fn validate(&self) -> std::result::Result<(), BTreeMap<&'static str, String>> {
        let mut errors = BTreeMap::new();

        if self.recipient_name.trim().is_empty() {
            errors.insert("recipientName", "Recipient name is required".to_owned());
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required".to_owned());
        } else if aims_core::Email::parse(self.email.trim()).is_err() {
            errors.insert("email", "Email is invalid".to_owned());
        }

        let digits: String = self.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.is_empty() {
            errors.insert("phone", "Phone number is required".to_owned());
        } else if digits.len() < 10 || digits.len() > 11 || !digits.chars().all(|c| c.is_ascii_digit())
        {
            errors.insert("phone", "Phone number is invalid".to_owned());
        }

        if self.province.trim().is_empty() {
            errors.insert("province", "Province is required".to_owned());
        }

        if self.address.trim().is_empty() {
            errors.insert("address", "Address is required".to_owned());
        }

        if self.is_rush_order {
            match &self.rush_delivery_time {
                None => {
                    errors.insert(
                        "rushDeliveryTime",
                        "Delivery time is required for rush orders".to_owned(),
                    );
                }
                Some(raw) if parse_rush_time(raw).is_none() => {
                    errors.insert("rushDeliveryTime", "Delivery time is invalid".to_owned());
                }
                Some(_) => {}
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Whether the province is rush-eligible at all.
    fn is_hanoi(&self) -> bool {
        let province = self.province.to_lowercase();
        province.contains("hanoi") || province.contains("hà nội") || province.contains("ha noi")
    }

    /// Turn the form into the wire delivery info with the given fee.
    fn into_delivery_info(self, delivery_fee: rust_decimal::Decimal) -> DeliveryInfo {
        let rush_delivery_time = self
            .rush_delivery_time
            .as_deref()
            .and_then(parse_rush_time);
        DeliveryInfo {
            id: None,
            recipient_name: self.recipient_name,
            email: self.email,
            phone_number: self.phone,
            province: self.province,
            district: self.district,
            delivery_address: self.address,
            is_rush_order: self.is_rush_order,
            rush_delivery_time,
            rush_delivery_instructions: self.rush_delivery_instructions,
            delivery_fee,
        }
    }
}

/// Parse an "HH:MM" rush delivery time.
fn parse_rush_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Resolve the promised rush delivery window.
///
/// The chosen time today when one was picked, otherwise two hours from now.
fn resolve_delivery_time(rush_time: Option<NaiveTime>, now: NaiveDateTime) -> NaiveDateTime {
    rush_time.map_or_else(
        || now + chrono::Duration::hours(2),
        |time| now.date().and_time(time),
    )
}

// =============================================================================
// View Models
// =============================================================================

/// Response to a successful delivery submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryView {
    pub order_ref: String,
    pub delivery: DeliveryInfo,
    pub invoice: InvoiceDraft,
    pub next: &'static str,
}

/// Rush-eligibility check result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RushEligibilityView {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Re-priced totals with the rush fee, present when eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<RushQuote>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RushQuote {
    pub subtotal: rust_decimal::Decimal,
    pub tax: rust_decimal::Decimal,
    pub delivery_fee: rust_decimal::Decimal,
    pub total: rust_decimal::Decimal,
}

/// Payment step summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummaryView {
    pub order_ref: String,
    pub delivery: DeliveryInfo,
    pub invoice: InvoiceDraft,
}

/// Gateway return outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationView {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    pub message: String,
    /// Where the client can go next.
    pub retry: Option<&'static str>,
    pub home: &'static str,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_checkout(session: &Session) -> Result<CheckoutSession> {
    let checkout: CheckoutSession = session
        .get(session_keys::CHECKOUT)
        .await
        .ok()
        .flatten()
        .ok_or(AppError::CheckoutExpired)?;

    if checkout.is_expired(Utc::now()) {
        session
            .remove::<CheckoutSession>(session_keys::CHECKOUT)
            .await
            .ok();
        return Err(AppError::CheckoutExpired);
    }

    Ok(checkout)
}

async fn save_checkout(session: &Session, checkout: &CheckoutSession) -> Result<()> {
    session
        .insert(session_keys::CHECKOUT, checkout)
        .await
        .map_err(|e| AppError::Internal(format!("failed to save checkout session: {e}")))
}

// =============================================================================
// Handlers
// =============================================================================

/// Submit delivery info and open a checkout session.
#[instrument(skip(session, form))]
pub async fn submit_delivery(
    session: Session,
    Json(mut form): Json<DeliveryForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("The cart is empty".to_owned()));
    }

    // A non-Hanoi address can never carry the rush flag, whatever the
    // client sent; the eligibility endpoint is not consulted for it either.
    if form.is_rush_order && !form.is_hanoi() {
        form.is_rush_order = false;
        form.rush_delivery_time = None;
    }

    if let Err(errors) = form.validate() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Validation failed", "errors": errors })),
        )
            .into_response());
    }

    let fee = crate::models::checkout::delivery_fee_quote(&form.province, form.is_rush_order);
    let delivery = form.into_delivery_info(fee);
    let invoice = InvoiceDraft::from_cart(&cart, fee);
    let checkout = CheckoutSession::new(delivery, invoice, Utc::now());

    save_checkout(&session, &checkout).await?;

    Ok(Json(DeliveryView {
        order_ref: checkout.order_ref,
        delivery: checkout.delivery,
        invoice: checkout.invoice,
        next: "/checkout/payment",
    })
    .into_response())
}

/// Check rush-order eligibility for the current cart and a candidate
/// address.
///
/// Non-Hanoi provinces are rejected locally - the backend endpoint is
/// never called for them.
#[instrument(skip(state, session, form))]
pub async fn rush_eligibility(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<DeliveryForm>,
) -> Result<Json<RushEligibilityView>> {
    if !form.is_hanoi() {
        return Ok(Json(RushEligibilityView {
            eligible: false,
            reason: Some(RUSH_HANOI_ONLY.to_owned()),
            quote: None,
        }));
    }

    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("The cart is empty".to_owned()));
    }

    let token = session_token(&session).await;
    let lines = CartLine::from_cart(&cart);
    let delivery = form.into_delivery_info(rust_decimal::Decimal::ZERO);

    match state
        .backend()
        .check_rush_eligibility(&lines, &delivery, token.as_deref())
        .await?
    {
        RushEligibility::Eligible => {
            // Re-price with the rush fee so the screen can show live totals
            let calc = state
                .backend()
                .calculate_cart(&lines, true, &delivery.province, token.as_deref())
                .await?;

            Ok(Json(RushEligibilityView {
                eligible: true,
                reason: None,
                quote: Some(RushQuote {
                    subtotal: calc.subtotal,
                    tax: calc.tax,
                    delivery_fee: calc.delivery_fee,
                    total: calc.total,
                }),
            }))
        }
        RushEligibility::Ineligible(reason) => Ok(Json(RushEligibilityView {
            eligible: false,
            reason: Some(reason),
            quote: None,
        })),
    }
}

/// Payment step summary.
#[instrument(skip(session))]
pub async fn payment_summary(session: Session) -> Result<Json<PaymentSummaryView>> {
    let checkout = load_checkout(&session).await?;

    Ok(Json(PaymentSummaryView {
        order_ref: checkout.order_ref,
        delivery: checkout.delivery,
        invoice: checkout.invoice,
    }))
}

/// Recompute the payable amount and redirect to the payment gateway.
#[instrument(skip(state, session))]
pub async fn start_payment(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut checkout = load_checkout(&session).await?;

    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("The cart is empty".to_owned()));
    }

    // Authoritative re-pricing of the live cart; the session-held figures
    // are display drafts only.
    let token = session_token(&session).await;
    let lines = CartLine::from_cart(&cart);
    let calc = state
        .backend()
        .calculate_cart(
            &lines,
            checkout.delivery.is_rush_order,
            &checkout.delivery.province,
            token.as_deref(),
        )
        .await?;

    checkout.invoice = InvoiceDraft {
        total_product_price_before_vat: calc.subtotal,
        total_product_price_after_vat: calc.subtotal + calc.tax,
        delivery_fee: calc.delivery_fee,
        total_amount: calc.total,
    };
    save_checkout(&session, &checkout).await?;

    let url = state
        .backend()
        .payment_redirect_url(calc.total, &checkout.order_ref)?;

    Ok(Redirect::to(url.as_str()).into_response())
}

/// Handle the gateway return: verify the response code, create the order,
/// fire the confirmation email, clear the cart.
#[instrument(skip(state, session, params))]
pub async fn confirmation(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<GatewayReturn>,
) -> Result<Json<ConfirmationView>> {
    let mut checkout = load_checkout(&session).await?;
    let token = session_token(&session).await;

    if !params.is_success() {
        // Leave the cart and checkout session in place for a retry
        return Ok(Json(ConfirmationView {
            success: false,
            order: None,
            message: "Payment was not successful. Please try again.".to_owned(),
            retry: Some("/checkout/payment"),
            home: "/",
        }));
    }

    // A reload of the confirmation page must not create a second order
    if let Some(order_id) = checkout.created_order {
        let order = state.backend().order(order_id, token.as_deref()).await?;
        return Ok(Json(ConfirmationView {
            success: true,
            order: Some(order),
            message: "Your order has been placed successfully.".to_owned(),
            retry: None,
            home: "/",
        }));
    }

    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Err(AppError::BadRequest("The cart is empty".to_owned()));
    }

    let now = Utc::now().naive_utc();
    let transaction = params.into_transaction(now);
    let lines = CartLine::from_cart(&cart);
    let invoice_data = InvoiceData {
        cart: CartSnapshot {
            total_product_price_before_vat: checkout.invoice.total_product_price_before_vat,
            items: lines,
        },
        total_product_price_before_vat: checkout.invoice.total_product_price_before_vat,
        total_product_price_after_vat: checkout.invoice.total_product_price_after_vat,
        delivery_fee: checkout.invoice.delivery_fee,
        total_amount: checkout.invoice.total_amount,
    };

    let order = if checkout.delivery.is_rush_order {
        let request = RushCheckoutRequest {
            delivery_time: resolve_delivery_time(checkout.delivery.rush_delivery_time, now),
            delivery_instruction: checkout
                .delivery
                .rush_delivery_instructions
                .clone()
                .unwrap_or_default(),
            delivery_info: checkout.delivery.clone(),
            invoice_request: invoice_data,
            transaction_request: RushTransactionData::from_transaction(&transaction),
            status: OrderStatus::Pending,
        };
        state
            .backend()
            .complete_rush_checkout(&request, token.as_deref())
            .await?
    } else {
        let request = CheckoutRequest {
            delivery_info: checkout.delivery.clone(),
            invoice_data,
            transaction_data: transaction,
            status: OrderStatus::Pending,
        };
        state
            .backend()
            .complete_checkout(&request, token.as_deref())
            .await?
    };

    // Best-effort confirmation email: capped at 5 seconds inside the
    // client, logged on failure, never surfaced, never retried.
    let backend = state.backend().clone();
    let recipient = checkout.delivery.email.clone();
    tokio::spawn(async move {
        if let Err(e) = backend.send_order_confirmation(&recipient).await {
            tracing::warn!("Order confirmation email not sent: {e}");
        }
    });

    checkout.created_order = Some(order.id);
    save_checkout(&session, &checkout).await?;

    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(ConfirmationView {
        success: true,
        order: Some(order),
        message: "Your order has been placed successfully.".to_owned(),
        retry: None,
        home: "/",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn valid_form() -> DeliveryForm {
        DeliveryForm {
            recipient_name: "Nguyen Van A".to_owned(),
            email: "a@example.com".to_owned(),
            phone: "0912345678".to_owned(),
            province: "Hanoi".to_owned(),
            district: Some("Hoan Kiem".to_owned()),
            address: "1 Trang Tien".to_owned(),
            is_rush_order: false,
            rush_delivery_time: None,
            rush_delivery_instructions: None,
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_attributed() {
        let form = DeliveryForm {
            recipient_name: String::new(),
            email: "bad".to_owned(),
            phone: "123".to_owned(),
            province: String::new(),
            address: String::new(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();
        assert!(errors.contains_key("recipientName"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("phone"));
        assert!(errors.contains_key("province"));
        assert!(errors.contains_key("address"));
    }

    #[test]
    fn test_phone_accepts_spaces_and_ten_or_eleven_digits() {
        let mut form = valid_form();
        form.phone = "091 234 5678".to_owned();
        assert!(form.validate().is_ok());

        form.phone = "09123456789".to_owned();
        assert!(form.validate().is_ok());

        form.phone = "091234567".to_owned(); // 9 digits
        assert!(form.validate().is_err());

        form.phone = "09123456a8".to_owned();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_rush_order_requires_delivery_time() {
        let mut form = valid_form();
        form.is_rush_order = true;
        assert!(form.validate().unwrap_err().contains_key("rushDeliveryTime"));

        form.rush_delivery_time = Some("14:30".to_owned());
        assert!(form.validate().is_ok());

        form.rush_delivery_time = Some("half past two".to_owned());
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_hanoi_prefilter() {
        assert!(valid_form().is_hanoi());

        let mut form = valid_form();
        form.province = "Da Nang".to_owned();
        assert!(!form.is_hanoi());
    }

    #[test]
    fn test_resolve_delivery_time_uses_chosen_time_today() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let chosen = NaiveTime::from_hms_opt(14, 30, 0).unwrap();

        let resolved = resolve_delivery_time(Some(chosen), now);
        assert_eq!(resolved, now.date().and_time(chosen));
    }

    #[test]
    fn test_resolve_delivery_time_defaults_to_two_hours_out() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        let resolved = resolve_delivery_time(None, now);
        assert_eq!(resolved, now + chrono::Duration::hours(2));
    }
}
