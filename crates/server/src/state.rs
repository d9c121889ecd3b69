//! Application state shared across handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ServerConfig;
use crate::shopify::{AdminClient, ShopifyError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    shopify: AdminClient,
    backfill_running: AtomicBool,
}

impl AppState {
    /// Build state, creating the Shopify client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be built.
    pub fn new(config: ServerConfig) -> Result<Self, ShopifyError> {
        let shopify = AdminClient::new(&config.shopify)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                backfill_running: AtomicBool::new(false),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Claim the backfill slot for this process.
    ///
    /// Returns `None` while another backfill holds it. The slot is released
    /// when the guard drops, including when the request is cancelled.
    #[must_use]
    pub fn try_begin_backfill(&self) -> Option<BackfillGuard> {
        self.inner
            .backfill_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BackfillGuard {
                state: self.clone(),
            })
    }
}

/// Holds the backfill slot; see [`AppState::try_begin_backfill`].
pub struct BackfillGuard {
    state: AppState,
}

impl Drop for BackfillGuard {
    fn drop(&mut self) {
        self.state
            .inner
            .backfill_running
            .store(false, Ordering::Release);
    }
}
