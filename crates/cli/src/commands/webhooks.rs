//! Webhook subscription commands.

use metasync_server::shopify::AdminClient;
use metasync_server::shopify::webhooks::CUSTOMERS_CREATE_TOPIC;

use super::{CommandError, print_json};

/// Print the registered customers/create subscriptions as JSON.
pub async fn list(client: &AdminClient) -> Result<(), CommandError> {
    let subscriptions = client
        .list_webhook_subscriptions(CUSTOMERS_CREATE_TOPIC)
        .await?;
    print_json(&subscriptions)
}

/// Register the customers/create webhook for `callback_url`.
pub async fn register(client: &AdminClient, callback_url: &str) -> Result<(), CommandError> {
    let id = client.ensure_customer_create_webhook(callback_url).await?;
    tracing::info!("Webhook subscription {id} delivers {CUSTOMERS_CREATE_TOPIC} to {callback_url}");
    Ok(())
}
