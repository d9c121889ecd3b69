//! Marketing consent sync for a single customer.
//!
//! Shopify keeps email consent on the customer record, where storefront
//! Liquid cannot read it. The sync copies the current state into a plain
//! text metafield that themes can read.

use metasync_core::{CustomerId, MarketingState};
use tracing::{error, info, instrument, warn};

use crate::shopify::{AdminClient, MetafieldInput};

/// Metafield namespace for the copied consent state.
pub const MARKETING_STATE_NAMESPACE: &str = "custom";
/// Metafield key for the copied consent state.
pub const MARKETING_STATE_KEY: &str = "marketing_state";
/// Metafield type for the copied consent state.
pub const MARKETING_STATE_TYPE: &str = "single_line_text_field";

/// Result of syncing one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentSyncOutcome {
    /// The state was written to the metafield.
    Written(MarketingState),
    /// Shopify has no consent state for the customer; nothing was written.
    NoMarketingState,
    /// Shopify has no such customer; nothing was written.
    CustomerNotFound,
    /// Reading or writing failed.
    Failed(String),
}

/// Copy a customer's email marketing state into the consent metafield.
///
/// Never returns an error: failures are logged and reported as
/// [`ConsentSyncOutcome::Failed`] so batch callers keep going.
#[instrument(skip(client), fields(customer_id = %customer_id))]
pub async fn sync_customer_consent(
    client: &AdminClient,
    customer_id: CustomerId,
) -> ConsentSyncOutcome {
    let consent = match client.get_customer_consent(customer_id).await {
        Ok(consent) => consent,
        Err(e) if e.is_not_found() => {
            error!("Customer not found");
            return ConsentSyncOutcome::CustomerNotFound;
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch marketing state");
            return ConsentSyncOutcome::Failed(e.to_string());
        }
    };

    let Some(state) = consent.marketing_state else {
        warn!("No marketing state found, skipping");
        return ConsentSyncOutcome::NoMarketingState;
    };

    let metafield = MetafieldInput::new(
        MARKETING_STATE_NAMESPACE,
        MARKETING_STATE_KEY,
        MARKETING_STATE_TYPE,
        state.as_str(),
    );

    match client.set_customer_metafield(customer_id, metafield).await {
        Ok(()) => {
            info!(marketing_state = %state, "Marketing state synced");
            ConsentSyncOutcome::Written(state)
        }
        Err(e) => {
            error!(error = %e, "Failed to write marketing state metafield");
            ConsentSyncOutcome::Failed(e.to_string())
        }
    }
}
