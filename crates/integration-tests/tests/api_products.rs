//! HTTP tests for product endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The API server running (cargo run -p shopfront-api)

use reqwest::StatusCode;
use serde_json::{Value, json};
use shopfront_integration_tests::{client, url};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_product_lifecycle() {
    let client = client();

    let resp = client
        .post(url("/products"))
        .json(&json!({"product_name": "Pen", "price": 1.5}))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(product["product_name"], "Pen");
    assert_eq!(product["price"], 1.5);
    let id = product["id"].as_i64().expect("numeric id");

    let resp = client
        .put(url(&format!("/products/{id}")))
        .json(&json!({"product_name": "Fountain Pen", "price": "12.25"}))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(updated["price"], 12.25);

    let listed: Vec<Value> = client
        .get(url("/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Invalid JSON");
    assert!(listed.contains(&updated));

    let resp = client
        .delete(url(&format!("/products/{id}")))
        .send()
        .await
        .expect("Failed to delete product");
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body, json!({"message": format!("Deleted product {id}")}));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_negative_price() {
    let resp = client()
        .post(url("/products"))
        .json(&json!({"product_name": "Refund", "price": -1}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body, json!({"price": ["Must be greater than or equal to 0."]}));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_missing_product() {
    let resp = client()
        .get(url("/products/2147483647"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body, json!({"message": "Product not found"}));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_update_missing_product_with_malformed_body() {
    let resp = client()
        .put(url("/products/2147483647"))
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body, json!({"message": "Product not found"}));
}
