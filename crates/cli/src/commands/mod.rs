//! Command implementations.

pub mod favorites;
pub mod sync;
pub mod webhooks;

use metasync_server::config::ConfigError;
use metasync_server::services::{BackfillError, FavoritesError};
use metasync_server::shopify::ShopifyError;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("Favorites error: {0}")]
    Favorites(#[from] FavoritesError),

    #[error(transparent)]
    Backfill(#[from] BackfillError),

    #[error("Sync failed: {0}")]
    SyncFailed(String),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Print `value` to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
