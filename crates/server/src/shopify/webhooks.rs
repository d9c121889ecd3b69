//! Webhook subscriptions and webhook authenticity checks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::{info, instrument};

use super::queries::{GetWebhookSubscriptions, WebhookSubscriptionCreate, format_user_errors};
use super::{AdminClient, ShopifyError, WebhookSubscription};

/// Topic fired when a customer account is created.
pub const CUSTOMERS_CREATE_TOPIC: &str = "CUSTOMERS_CREATE";

/// Header carrying the base64 HMAC-SHA256 of the webhook body.
pub const HMAC_HEADER: &str = "x-shopify-hmac-sha256";

/// Subscriptions per topic fit in one page.
const SUBSCRIPTION_PAGE_SIZE: i64 = 100;

/// Why a webhook signature was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookVerifyError {
    #[error("Missing webhook signature")]
    MissingSignature,
    #[error("Malformed webhook signature")]
    Malformed,
    #[error("Webhook signature mismatch")]
    Mismatch,
}

/// Verify a webhook body against its `X-Shopify-Hmac-Sha256` header.
///
/// The comparison runs in constant time.
///
/// # Errors
///
/// Returns a [`WebhookVerifyError`] when the header is missing, is not
/// valid base64, or does not match the body.
pub fn verify_webhook_hmac(
    secret: &SecretString,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), WebhookVerifyError> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(WebhookVerifyError::MissingSignature)?;
    let expected = STANDARD
        .decode(signature)
        .map_err(|_| WebhookVerifyError::Malformed)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| WebhookVerifyError::Malformed)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| WebhookVerifyError::Mismatch)
}

impl AdminClient {
    /// List webhook subscriptions registered for `topic`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn list_webhook_subscriptions(
        &self,
        topic: &str,
    ) -> Result<Vec<WebhookSubscription>, ShopifyError> {
        let variables = super::queries::get_webhook_subscriptions::Variables {
            first: SUBSCRIPTION_PAGE_SIZE,
            topics: Some(vec![topic.to_string()]),
        };

        let response = self.execute::<GetWebhookSubscriptions>(variables).await?;

        Ok(response
            .webhook_subscriptions
            .edges
            .into_iter()
            .map(|edge| WebhookSubscription {
                id: edge.node.id,
                topic: edge.node.topic,
                callback_url: edge.node.endpoint.and_then(|e| e.callback_url),
            })
            .collect())
    }

    /// Register a JSON webhook subscription for `topic`.
    ///
    /// Returns the new subscription ID.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the subscription
    /// (for example a callback URL it cannot reach), or another error if the
    /// API request fails.
    #[instrument(skip(self))]
    pub async fn create_webhook_subscription(
        &self,
        topic: &str,
        callback_url: &str,
    ) -> Result<String, ShopifyError> {
        use super::queries::webhook_subscription_create::{Variables, WebhookSubscriptionInput};

        let variables = Variables {
            topic: topic.to_string(),
            webhook_subscription: WebhookSubscriptionInput {
                callback_url: callback_url.to_string(),
                format: "JSON".to_string(),
            },
        };

        let response = self.execute::<WebhookSubscriptionCreate>(variables).await?;
        let payload = response.webhook_subscription_create.ok_or_else(|| {
            ShopifyError::UserError("webhookSubscriptionCreate returned no payload".to_string())
        })?;

        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserError(format_user_errors(
                &payload.user_errors,
            )));
        }

        payload
            .webhook_subscription
            .map(|subscription| subscription.id)
            .ok_or_else(|| ShopifyError::UserError("No subscription returned".to_string()))
    }

    /// Make sure customer-created events are delivered to `callback_url`.
    ///
    /// Does nothing if a subscription with the same callback already exists.
    /// Returns the subscription ID either way.
    ///
    /// # Errors
    ///
    /// Returns an error if listing or creating the subscription fails.
    #[instrument(skip(self))]
    pub async fn ensure_customer_create_webhook(
        &self,
        callback_url: &str,
    ) -> Result<String, ShopifyError> {
        let existing = self
            .list_webhook_subscriptions(CUSTOMERS_CREATE_TOPIC)
            .await?
            .into_iter()
            .find(|subscription| subscription.callback_url.as_deref() == Some(callback_url));

        if let Some(subscription) = existing {
            info!(subscription_id = %subscription.id, "Webhook already registered");
            return Ok(subscription.id);
        }

        let id = self
            .create_webhook_subscription(CUSTOMERS_CREATE_TOPIC, callback_url)
            .await?;
        info!(subscription_id = %id, "Registered customer create webhook");
        Ok(id)
    }
}
