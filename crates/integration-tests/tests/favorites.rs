//! Integration tests for the favorites API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use metasync_integration_tests::{
    GRAPHQL_PATH, TestContext, Value, empty_request, json, json_request, update_ok_response,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const FAVORITES_URI: &str = "/api/customers/42/favorites";
const PRODUCT_PATH: &str = "/admin/api/2024-10/products/632910392.json";

async fn mount_favorites(ctx: &TestContext, value: Option<&str>) {
    let metafield = value.map(|v| json!({ "id": "gid://shopify/Metafield/9", "value": v }));
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "operationName": "GetCustomerMetafield",
            "variables": { "id": "gid://shopify/Customer/42", "namespace": "custom", "key": "favorites" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "customer": { "id": "gid://shopify/Customer/42", "metafield": metafield } }
        })))
        .mount(&ctx.shopify)
        .await;
}

async fn mount_product(ctx: &TestContext, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(PRODUCT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "product": {
                "id": 632_910_392,
                "title": "IPod Nano - 8GB",
                "handle": "ipod-nano",
                "image": null,
                "images": [{ "src": "https://cdn.shopify.com/ipod-nano.png" }],
                "variants": [{
                    "id": 808_950_810,
                    "price": "199.00",
                    "compare_at_price": "249.00",
                    "inventory_management": "shopify",
                    "inventory_policy": "continue",
                    "inventory_quantity": 0
                }]
            }
        })))
        .expect(expected_calls)
        .mount(&ctx.shopify)
        .await;
}

async fn mount_write(ctx: &TestContext, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "operationName": "CustomerUpdateMetafields",
            "variables": { "input": {
                "id": "gid://shopify/Customer/42",
                "metafields": [{ "namespace": "custom", "key": "favorites", "type": "json" }]
            } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(update_ok_response(42)))
        .expect(expected_calls)
        .mount(&ctx.shopify)
        .await;
}

fn add_body() -> Value {
    json!({
        "productId": "gid://shopify/Product/632910392",
        "variantId": "808950810",
        "productUrl": "https://shop.example.com/products/ipod-nano"
    })
}

#[tokio::test]
async fn test_list_without_metafield_is_empty() {
    let ctx = TestContext::new().await;
    mount_favorites(&ctx, None).await;

    let response = ctx.send(empty_request(Method::GET, FAVORITES_URI)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_list_returns_stored_favorites() {
    let ctx = TestContext::new().await;
    let stored = json!([{
        "productId": "632910392",
        "variantId": "808950810",
        "productUrl": "/products/ipod-nano",
        "title": "IPod Nano - 8GB",
        "imageUrl": null,
        "price": "199.00",
        "available": true
    }]);
    mount_favorites(&ctx, Some(&stored.to_string())).await;

    let response = ctx.send(empty_request(Method::GET, FAVORITES_URI)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "IPod Nano - 8GB");
}

#[tokio::test]
async fn test_list_with_corrupt_metafield_is_500() {
    let ctx = TestContext::new().await;
    mount_favorites(&ctx, Some("[{\"oops\"")).await;

    let response = ctx.send(empty_request(Method::GET, FAVORITES_URI)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_invalid_customer_id_is_400() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(empty_request(Method::GET, "/api/customers/not-a-number/favorites"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.shopify_calls().await, 0);
}

#[tokio::test]
async fn test_add_enriches_and_writes() {
    let ctx = TestContext::new().await;
    mount_favorites(&ctx, None).await;
    mount_product(&ctx, 1).await;
    mount_write(&ctx, 1).await;

    let response = ctx
        .send(json_request(Method::POST, FAVORITES_URI, &add_body()))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(
        body,
        json!([{
            "productId": "632910392",
            "variantId": "808950810",
            "productUrl": "https://shop.example.com/products/ipod-nano",
            "title": "IPod Nano - 8GB",
            "imageUrl": "https://cdn.shopify.com/ipod-nano.png",
            "price": "199.00",
            "compareAtPrice": "249.00",
            "discountPercentage": 20,
            "available": true
        }])
    );
}

#[tokio::test]
async fn test_add_existing_product_is_a_no_op() {
    let ctx = TestContext::new().await;
    let stored = json!([{
        "productId": "632910392",
        "variantId": "808950810",
        "productUrl": "/products/ipod-nano",
        "title": "IPod Nano - 8GB",
        "imageUrl": null,
        "price": "199.00",
        "available": true
    }]);
    mount_favorites(&ctx, Some(&stored.to_string())).await;
    mount_product(&ctx, 0).await;
    mount_write(&ctx, 0).await;

    let response = ctx
        .send(json_request(Method::POST, FAVORITES_URI, &add_body()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_with_missing_fields_is_400() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(json_request(
            Method::POST,
            FAVORITES_URI,
            &json!({ "productId": "632910392" }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.shopify_calls().await, 0);
}

#[tokio::test]
async fn test_add_unknown_product_is_400() {
    let ctx = TestContext::new().await;
    mount_favorites(&ctx, None).await;
    mount_write(&ctx, 0).await;
    Mock::given(method("GET"))
        .and(path(PRODUCT_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.shopify)
        .await;

    let response = ctx
        .send(json_request(Method::POST, FAVORITES_URI, &add_body()))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
