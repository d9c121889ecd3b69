//! Integration tests for the customers/create webhook.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use metasync_integration_tests::{
    GRAPHQL_PATH, TestContext, WEBHOOK_SECRET, consent_response, json, sign, update_ok_response,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const WEBHOOK_URI: &str = "/webhooks/customers/create";

fn webhook(body: &[u8], signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_URI)
        .header("content-type", "application/json")
        .header("x-shopify-topic", "customers/create");
    if let Some(signature) = signature {
        builder = builder.header("x-shopify-hmac-sha256", signature);
    }
    builder.body(Body::from(body.to_vec())).unwrap()
}

async fn mount_sync(ctx: &TestContext, state: Option<&str>, expected_writes: u64) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "operationName": "GetCustomerMarketingState",
            "variables": { "id": "gid://shopify/Customer/706405506930370084" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(consent_response(706_405_506_930_370_084, state)))
        .expect(1)
        .mount(&ctx.shopify)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({
            "operationName": "CustomerUpdateMetafields",
            "variables": { "input": {
                "id": "gid://shopify/Customer/706405506930370084",
                "metafields": [{ "namespace": "custom", "key": "marketing_state", "type": "single_line_text_field" }]
            } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(update_ok_response(706_405_506_930_370_084)))
        .expect(expected_writes)
        .mount(&ctx.shopify)
        .await;
}

fn payload() -> Vec<u8> {
    json!({
        "id": 706_405_506_930_370_084_u64,
        "email": "bob@example.com",
        "admin_graphql_api_id": "gid://shopify/Customer/706405506930370084"
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn test_webhook_syncs_marketing_state() {
    let ctx = TestContext::new().await;
    mount_sync(&ctx, Some("SUBSCRIBED"), 1).await;

    let response = ctx.send(webhook(&payload(), None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "Webhook processed");
}

#[tokio::test]
async fn test_webhook_without_marketing_state_writes_nothing() {
    let ctx = TestContext::new().await;
    mount_sync(&ctx, None, 0).await;

    let response = ctx.send(webhook(&payload(), None)).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_with_valid_signature() {
    let ctx = TestContext::with_webhook_secret().await;
    mount_sync(&ctx, Some("NOT_SUBSCRIBED"), 1).await;

    let body = payload();
    let signature = sign(WEBHOOK_SECRET, &body);
    let response = ctx.send(webhook(&body, Some(&signature))).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_with_bad_signature_is_rejected() {
    let ctx = TestContext::with_webhook_secret().await;

    let body = payload();
    let signature = sign("some-other-secret", &body);
    let response = ctx.send(webhook(&body, Some(&signature))).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.shopify_calls().await, 0);
}

#[tokio::test]
async fn test_webhook_without_signature_is_rejected() {
    let ctx = TestContext::with_webhook_secret().await;

    let response = ctx.send(webhook(&payload(), None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.shopify_calls().await, 0);
}

#[tokio::test]
async fn test_webhook_with_invalid_payload() {
    let ctx = TestContext::new().await;

    let response = ctx.send(webhook(br#"{"email":"no-id@example.com"}"#, None)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.shopify_calls().await, 0);
}

#[tokio::test]
async fn test_webhook_failed_sync_is_500() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&ctx.shopify)
        .await;

    let response = ctx.send(webhook(&payload(), None)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal server error");
}
