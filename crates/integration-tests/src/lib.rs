//! Integration tests for Metasync.
//!
//! Each test drives the full axum router with `tower::ServiceExt::oneshot`
//! while a `wiremock` server stands in for the Shopify Admin API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p metasync-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use metasync_server::config::{ServerConfig, ShopifyConfig, SyncConfig};
use metasync_server::routes;
use metasync_server::shopify::RetryPolicy;
use metasync_server::state::AppState;
use secrecy::SecretString;
use sha2::Sha256;
use tower::ServiceExt;
use wiremock::MockServer;

pub use serde_json::{Value, json};

/// Admin API GraphQL path on the mock server.
pub const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";

/// Webhook secret used by tests that enable signature checks.
pub const WEBHOOK_SECRET: &str = "test-webhook-secret";

/// A router wired to a mock Shopify.
pub struct TestContext {
    pub shopify: MockServer,
    pub app: Router,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }
}

impl TestContext {
    /// Context without webhook signature checks.
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Context that requires `X-Shopify-Hmac-Sha256` on webhooks.
    pub async fn with_webhook_secret() -> Self {
        Self::build(Some(WEBHOOK_SECRET)).await
    }

    async fn build(webhook_secret: Option<&str>) -> Self {
        let shopify = MockServer::start().await;
        let config = test_config(&shopify, webhook_secret);
        let app = routes::app(AppState::new(config).unwrap());
        Self { shopify, app }
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Number of requests Shopify received.
    pub async fn shopify_calls(&self) -> usize {
        self.shopify
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

/// Server config pointing at the mock Shopify with fast retries and no
/// backfill pacing.
pub fn test_config(shopify: &MockServer, webhook_secret: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        shopify: ShopifyConfig {
            store: shopify.uri(),
            api_version: "2024-10".to_string(),
            access_token: SecretString::from("shpat_integration"),
            webhook_secret: webhook_secret.map(SecretString::from),
            retry: RetryPolicy::new(3, Duration::from_millis(1)),
        },
        sync: SyncConfig {
            page_size: 250,
            customer_delay: Duration::from_millis(1),
        },
        cors_allowed_origins: vec![],
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Base64 HMAC-SHA256 of `body`, as Shopify signs webhooks.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// A JSON request.
pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A request without a body.
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// GraphQL response for the marketing state lookup.
pub fn consent_response(customer_id: u64, state: Option<&str>) -> Value {
    json!({
        "data": {
            "customer": {
                "id": format!("gid://shopify/Customer/{customer_id}"),
                "email": "customer@example.com",
                "emailMarketingConsent": { "marketingState": state }
            }
        }
    })
}

/// GraphQL response for a successful `customerUpdate`.
pub fn update_ok_response(customer_id: u64) -> Value {
    json!({
        "data": {
            "customerUpdate": {
                "customer": { "id": format!("gid://shopify/Customer/{customer_id}") },
                "userErrors": []
            }
        }
    })
}
