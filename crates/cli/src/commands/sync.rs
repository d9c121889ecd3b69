//! Consent sync commands.

use metasync_core::CustomerId;
use metasync_server::config::SyncConfig;
use metasync_server::services::{ConsentSyncOutcome, run_backfill, sync_customer_consent};
use metasync_server::shopify::AdminClient;

use super::{CommandError, print_json};

/// Run the backfill and print its summary as JSON.
pub async fn backfill(client: &AdminClient, config: &SyncConfig) -> Result<(), CommandError> {
    let summary = run_backfill(client, config).await?;
    print_json(&summary)
}

/// Sync one customer; a failed sync is a command failure.
pub async fn customer(client: &AdminClient, customer_id: CustomerId) -> Result<(), CommandError> {
    match sync_customer_consent(client, customer_id).await {
        ConsentSyncOutcome::Written(state) => {
            tracing::info!("Customer {customer_id}: wrote marketing state {state}");
        }
        ConsentSyncOutcome::NoMarketingState => {
            tracing::warn!("Customer {customer_id}: no marketing state, nothing written");
        }
        ConsentSyncOutcome::CustomerNotFound => {
            return Err(CommandError::SyncFailed(format!(
                "customer {customer_id} not found"
            )));
        }
        ConsentSyncOutcome::Failed(reason) => return Err(CommandError::SyncFailed(reason)),
    }
    Ok(())
}
