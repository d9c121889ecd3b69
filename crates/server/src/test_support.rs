//! Shared fixtures for unit tests that talk to a mocked Shopify.

use std::time::Duration;

use secrecy::SecretString;
use wiremock::MockServer;

use crate::config::ShopifyConfig;
use crate::shopify::{AdminClient, RetryPolicy};

pub const TEST_TOKEN: &str = "shpat_test_token";
pub const API_VERSION: &str = "2024-10";
pub const GRAPHQL_PATH: &str = "/admin/api/2024-10/graphql.json";

/// Shopify config pointing at the mock server, with a fast retry policy.
pub fn test_shopify_config(server: &MockServer) -> ShopifyConfig {
    ShopifyConfig {
        store: server.uri(),
        api_version: API_VERSION.to_string(),
        access_token: SecretString::from(TEST_TOKEN),
        webhook_secret: None,
        retry: RetryPolicy::new(3, Duration::from_millis(1)),
    }
}

#[allow(clippy::unwrap_used)]
pub fn test_client(server: &MockServer) -> AdminClient {
    AdminClient::new(&test_shopify_config(server)).unwrap()
}
