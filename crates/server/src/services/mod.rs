//! Sync jobs built on the Shopify client.
//!
//! # Services
//!
//! - `consent` - Copy a customer's marketing consent into a metafield
//! - `backfill` - Run the consent sync over every customer
//! - `favorites` - Read and append the favorites metafield

pub mod backfill;
pub mod consent;
pub mod favorites;

pub use backfill::{BackfillError, BackfillSummary, run_backfill};
pub use consent::{ConsentSyncOutcome, sync_customer_consent};
pub use favorites::{AppendOutcome, FavoriteRequest, FavoritesError, add_favorite, get_favorites};
