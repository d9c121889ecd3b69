//! Shopify Admin API HTTP client.
//!
//! Owns the `reqwest` client, the access token header and the retry policy.
//! Resource-specific methods live in the sibling `customers`, `products` and
//! `webhooks` modules as further `impl AdminClient` blocks.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, de::DeserializeOwned};

use crate::config::ShopifyConfig;

use super::retry::{RetryPolicy, retry};
use super::{GraphQLError, GraphQLErrorLocation, ShopifyError};

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

/// Shopify Admin API client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Security
///
/// This client carries the Admin API access token, which has HIGH
/// PRIVILEGE access to the store.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    retry: RetryPolicy,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::InvalidToken` if the access token contains
    /// characters not allowed in a header, or `ShopifyError::Http` if the
    /// HTTP client fails to build.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let mut token = HeaderValue::from_str(config.access_token.expose_secret())
            .map_err(|e| ShopifyError::InvalidToken(e.to_string()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: config.base_url(),
                api_version: config.api_version.clone(),
                retry: config.retry,
            }),
        })
    }

    /// Absolute URL of an Admin API resource path.
    fn admin_url(&self, path: &str) -> String {
        format!(
            "{}/admin/api/{}/{}",
            self.inner.base_url, self.inner.api_version, path
        )
    }

    /// Send a request built by `build`, retrying transport failures and
    /// non-success statuses according to the client's policy.
    async fn send<F>(&self, build: F) -> Result<reqwest::Response, ShopifyError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let build = &build;
        retry(self.inner.retry, move || async move {
            let response = build().send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let body = response.text().await.unwrap_or_default();
            Err(ShopifyError::Status {
                status: status.as_u16(),
                body,
            })
        })
        .await
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    pub(crate) async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let endpoint = self.admin_url("graphql.json");
        let body = Q::build_query(variables);

        let response = self
            .send(|| self.inner.client.post(&endpoint).json(&body))
            .await?;
        let text = response.text().await?;
        let graphql_response: GraphQLResponse<Q::ResponseData> = serde_json::from_str(&text)?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(ShopifyError::GraphQL(converted_errors));
        }

        graphql_response
            .data
            .ok_or_else(|| ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
    }

    // =========================================================================
    // REST Execution
    // =========================================================================

    /// GET a REST resource and decode its JSON body.
    pub(crate) async fn get_rest<T: DeserializeOwned>(&self, path: &str) -> Result<T, ShopifyError> {
        let url = self.admin_url(path);
        let response = self.send(|| self.inner.client.get(&url)).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url)
            .field("api_version", &self.inner.api_version)
            .field("retry", &self.inner.retry)
            .finish_non_exhaustive()
    }
}
