//! Integration tests for the checkout pipeline.
//!
//! These tests require:
//! - A running AIMS backend with a seeded catalog
//! - The storefront running (cargo run -p aims-storefront)
//!
//! The gateway leg is exercised up to the redirect; a full round trip
//! needs the hosted payment sandbox.
//!
//! Run with: cargo test -p aims-integration-tests -- --ignored

use aims_integration_tests::{session_client, storefront_base_url};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn add_first_product(client: &reqwest::Client) {
    let base_url = storefront_base_url();
    let body: Value = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to load home page")
        .json()
        .await
        .expect("Home page was not JSON");
    let product_id = body["products"][0]["id"]
        .as_i64()
        .expect("Home page listed no products");

    client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "productId": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");
}

fn delivery_form(province: &str, rush: bool) -> Value {
    json!({
        "recipientName": "Nguyen Van A",
        "email": "a@example.com",
        "phone": "0912345678",
        "province": province,
        "district": "Hoan Kiem",
        "address": "1 Trang Tien",
        "isRushOrder": rush,
        "rushDeliveryTime": if rush { Some("14:30") } else { None },
    })
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_delivery_step_rejects_empty_cart() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/checkout/delivery"))
        .json(&delivery_form("Hanoi", false))
        .send()
        .await
        .expect("Failed to submit delivery info");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_delivery_step_returns_field_errors() {
    let client = session_client();
    let base_url = storefront_base_url();
    add_first_product(&client).await;

    let resp = client
        .post(format!("{base_url}/checkout/delivery"))
        .json(&json!({ "recipientName": "", "email": "not-an-email" }))
        .send()
        .await
        .expect("Failed to submit delivery info");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Error body was not JSON");
    assert!(body["errors"]["recipientName"].is_string());
    assert!(body["errors"]["email"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_non_hanoi_rush_toggle_is_rejected_locally() {
    let client = session_client();
    let base_url = storefront_base_url();
    add_first_product(&client).await;

    let resp = client
        .post(format!("{base_url}/checkout/rush-eligibility"))
        .json(&delivery_form("Da Nang", true))
        .send()
        .await
        .expect("Failed to check rush eligibility");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Body was not JSON");
    assert_eq!(body["eligible"], false);
    assert!(
        body["reason"]
            .as_str()
            .unwrap_or_default()
            .contains("Hanoi")
    );
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_payment_redirects_to_gateway_with_fresh_amount() {
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client");
    let base_url = storefront_base_url();

    add_first_product(&client).await;

    let resp = client
        .post(format!("{base_url}/checkout/delivery"))
        .json(&delivery_form("Hanoi", false))
        .send()
        .await
        .expect("Failed to submit delivery info");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/checkout/payment"))
        .send()
        .await
        .expect("Failed to start payment");

    // 303 to the gateway pass-through carrying gateway/amount/orderId
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.contains("gateway="));
    assert!(location.contains("amount="));
    assert!(location.contains("orderId="));
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_failed_gateway_return_keeps_session_for_retry() {
    let client = session_client();
    let base_url = storefront_base_url();

    add_first_product(&client).await;
    client
        .post(format!("{base_url}/checkout/delivery"))
        .json(&delivery_form("Hanoi", false))
        .send()
        .await
        .expect("Failed to submit delivery info");

    // Gateway says no (code 24 = customer cancelled)
    let resp = client
        .get(format!(
            "{base_url}/checkout/confirmation?vnp_ResponseCode=24"
        ))
        .send()
        .await
        .expect("Failed to load confirmation");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Body was not JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["retry"], "/checkout/payment");

    // The payment summary is still there for a retry
    let resp = client
        .get(format!("{base_url}/checkout/payment"))
        .send()
        .await
        .expect("Failed to load payment summary");
    assert_eq!(resp.status(), StatusCode::OK);
}
