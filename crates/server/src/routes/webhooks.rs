//! Shopify webhook receiver.
//!
//! Handles `customers/create` deliveries by syncing the new customer's
//! marketing consent into its metafield.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use metasync_core::CustomerId;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::services::{ConsentSyncOutcome, sync_customer_consent};
use crate::shopify::webhooks::{HMAC_HEADER, verify_webhook_hmac};
use crate::state::AppState;

/// The fields of the customer webhook payload we use.
#[derive(Debug, Deserialize)]
struct CustomerWebhook {
    id: CustomerId,
}

/// Create webhook routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhooks/customers/create", post(customer_created))
}

/// Handle a customer created webhook.
///
/// Responds only after the sync has finished; a failed sync answers 500 so
/// Shopify redelivers the webhook.
#[instrument(skip_all)]
async fn customer_created(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AppError> {
    if let Some(secret) = &state.config().shopify.webhook_secret {
        let signature = headers.get(HMAC_HEADER).and_then(|v| v.to_str().ok());
        verify_webhook_hmac(secret, &body, signature)?;
        debug!("Webhook signature verified");
    }

    let payload: CustomerWebhook = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    match sync_customer_consent(state.shopify(), payload.id).await {
        ConsentSyncOutcome::Failed(reason) => Err(AppError::Internal(reason)),
        ConsentSyncOutcome::Written(_)
        | ConsentSyncOutcome::NoMarketingState
        | ConsentSyncOutcome::CustomerNotFound => Ok((StatusCode::OK, "Webhook processed")),
    }
}
