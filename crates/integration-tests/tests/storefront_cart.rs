//! Integration tests for the storefront cart.
//!
//! These tests require:
//! - A running AIMS backend with a seeded catalog
//! - The storefront running (cargo run -p aims-storefront)
//!
//! Run with: cargo test -p aims-integration-tests -- --ignored

use aims_integration_tests::{session_client, storefront_base_url};
use reqwest::StatusCode;
use serde_json::{Value, json};

/// Pick any product id off the home page.
async fn first_product_id(client: &reqwest::Client) -> i64 {
    let base_url = storefront_base_url();
    let body: Value = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to load home page")
        .json()
        .await
        .expect("Home page was not JSON");

    body["products"][0]["id"]
        .as_i64()
        .expect("Home page listed no products")
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_empty_cart_shape() {
    let client = session_client();
    let base_url = storefront_base_url();

    let body: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Cart was not JSON");

    assert_eq!(body["itemCount"], 0);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_add_merges_lines_and_recomputes_totals() {
    let client = session_client();
    let base_url = storefront_base_url();
    let product_id = first_product_id(&client).await;

    // Add the same product twice
    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/cart/add"))
            .json(&json!({ "productId": product_id, "quantity": 1 }))
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let body: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Cart was not JSON");

    // One line, quantity 2 - not two lines
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["itemCount"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_remove_absent_product_is_noop() {
    let client = session_client();
    let base_url = storefront_base_url();
    let product_id = first_product_id(&client).await;

    client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "productId": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");

    let resp = client
        .post(format!("{base_url}/cart/remove"))
        .json(&json!({ "productId": 999_999_999 }))
        .send()
        .await
        .expect("Failed to call remove");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Cart was not JSON");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running storefront and backend"]
async fn test_zero_quantity_add_is_rejected() {
    let client = session_client();
    let base_url = storefront_base_url();
    let product_id = first_product_id(&client).await;

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "productId": product_id, "quantity": 0 }))
        .send()
        .await
        .expect("Failed to call add");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
