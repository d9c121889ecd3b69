//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the Shopify Admin API access token.** The token can
//! read and write every customer in the store.
//!
//! # Architecture
//!
//! - GraphQL (`graphql.json`) for customer reads, metafield writes and
//!   webhook subscriptions, with operations defined in [`queries`]
//! - REST (`products/{id}.json`) for product lookups
//! - Every request goes through [`retry`] with the configured [`RetryPolicy`]
//! - No local state: metafields on the customer are the only storage
//!
//! # Example
//!
//! ```rust,ignore
//! use metasync_server::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify)?;
//!
//! // Read a customer's consent state
//! let consent = client.get_customer_consent(customer_id).await?;
//!
//! // Page through customers
//! let page = client.get_customers(250, None).await?;
//! ```

mod client;
mod customers;
mod products;
pub mod queries;
mod retry;
pub mod types;
pub mod webhooks;

pub use client::AdminClient;
pub use retry::{RetryPolicy, retry};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("HTTP status {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// The access token cannot be sent as a header.
    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

impl ShopifyError {
    /// Whether Shopify reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Status { status: 404, .. })
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
