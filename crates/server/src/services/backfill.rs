//! Consent backfill over every customer in the store.
//!
//! Pages through customers in listing order and runs the single-customer
//! consent sync on each one, sequentially, pausing between customers to
//! stay under Shopify's rate limits. There is no checkpointing: a failed
//! page fetch ends the run and a rerun starts from the first page.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::consent::{ConsentSyncOutcome, sync_customer_consent};
use crate::config::SyncConfig;
use crate::shopify::{AdminClient, ShopifyError};

/// Counters for a backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillSummary {
    /// Customer pages fetched.
    pub pages: usize,
    /// Customers visited.
    pub customers: usize,
    /// Customers whose metafield was written.
    pub written: usize,
    /// Customers skipped (no consent state, or no longer present).
    pub skipped: usize,
    /// Customers whose sync failed.
    pub failed: usize,
}

impl BackfillSummary {
    fn record(&mut self, outcome: &ConsentSyncOutcome) {
        match outcome {
            ConsentSyncOutcome::Written(_) => self.written += 1,
            ConsentSyncOutcome::NoMarketingState | ConsentSyncOutcome::CustomerNotFound => {
                self.skipped += 1;
            }
            ConsentSyncOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// A page fetch failed and the backfill stopped.
#[derive(Debug, Error)]
#[error("Backfill aborted after {} pages: {source}", .summary.pages)]
pub struct BackfillError {
    /// Progress made before the failure.
    pub summary: BackfillSummary,
    /// The page fetch error.
    pub source: ShopifyError,
}

/// Sync marketing consent for every customer.
///
/// # Errors
///
/// Returns [`BackfillError`] if a customer page cannot be fetched.
/// Individual customer failures are counted, not returned.
#[instrument(skip_all, fields(page_size = config.page_size))]
pub async fn run_backfill(
    client: &AdminClient,
    config: &SyncConfig,
) -> Result<BackfillSummary, BackfillError> {
    let mut summary = BackfillSummary::default();
    let mut cursor: Option<String> = None;

    info!("Starting marketing state backfill");

    loop {
        let page = match client.get_customers(config.page_size, cursor.clone()).await {
            Ok(page) => page,
            Err(source) => {
                error!(error = %source, cursor = ?cursor, "Failed to fetch customer page, aborting backfill");
                return Err(BackfillError { summary, source });
            }
        };
        summary.pages += 1;

        for edge in &page.edges {
            summary.customers += 1;
            let outcome = sync_customer_consent(client, edge.customer.id).await;
            summary.record(&outcome);
            tokio::time::sleep(config.customer_delay).await;
        }

        if !page.has_next_page {
            break;
        }

        match page.last_cursor() {
            Some(next) => cursor = Some(next.to_string()),
            None => {
                warn!("Empty customer page reported more pages, stopping");
                break;
            }
        }
    }

    info!(
        pages = summary.pages,
        customers = summary.customers,
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed,
        "Backfill complete"
    );

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_support::{GRAPHQL_PATH, test_client};

    fn sync_config() -> SyncConfig {
        SyncConfig {
            page_size: 2,
            customer_delay: Duration::from_millis(1),
        }
    }

    /// Mount a customer page answered for requests continuing after `after`.
    async fn mount_page(
        server: &MockServer,
        after: Option<&str>,
        ids: &[u64],
        has_next_page: bool,
        expected_calls: u64,
    ) {
        let edges: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "cursor": format!("c{id}"),
                    "node": { "id": format!("gid://shopify/Customer/{id}"), "email": null }
                })
            })
            .collect();

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "GetCustomers",
                "variables": { "after": after }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "customers": {
                        "edges": edges,
                        "pageInfo": { "hasNextPage": has_next_page }
                    }
                }
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    async fn mount_consent(server: &MockServer, id: u64, state: Option<&str>) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "GetCustomerMarketingState",
                "variables": { "id": format!("gid://shopify/Customer/{id}") }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "customer": {
                        "id": format!("gid://shopify/Customer/{id}"),
                        "email": null,
                        "emailMarketingConsent": { "marketingState": state }
                    }
                }
            })))
            .mount(server)
            .await;
    }

    async fn mount_update(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({ "operationName": "CustomerUpdateMetafields" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "customerUpdate": { "customer": { "id": "gid://shopify/Customer/1" }, "userErrors": [] } }
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_follows_cursor_across_pages() {
        let server = MockServer::start().await;
        mount_page(&server, None, &[1, 2], true, 1).await;
        mount_page(&server, Some("c2"), &[3], false, 1).await;
        for id in 1..=3 {
            mount_consent(&server, id, Some("SUBSCRIBED")).await;
        }
        mount_update(&server, 3).await;

        let summary = run_backfill(&test_client(&server), &sync_config()).await.unwrap();

        assert_eq!(
            summary,
            BackfillSummary {
                pages: 2,
                customers: 3,
                written: 3,
                skipped: 0,
                failed: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_last_page_stops_fetching() {
        let server = MockServer::start().await;
        mount_page(&server, None, &[1], false, 1).await;
        mount_consent(&server, 1, None).await;
        mount_update(&server, 0).await;

        let summary = run_backfill(&test_client(&server), &sync_config()).await.unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.written, 0);
    }

    #[tokio::test]
    async fn test_empty_page_stops_even_if_more_reported() {
        let server = MockServer::start().await;
        mount_page(&server, None, &[], true, 1).await;

        let summary = run_backfill(&test_client(&server), &sync_config()).await.unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(summary.customers, 0);
    }

    #[tokio::test]
    async fn test_page_failure_aborts() {
        let server = MockServer::start().await;
        mount_page(&server, None, &[1], true, 1).await;
        mount_consent(&server, 1, Some("PENDING")).await;
        mount_update(&server, 1).await;

        // The second page fails every retry; nothing after it is requested.
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "GetCustomers",
                "variables": { "after": "c1" }
            })))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = run_backfill(&test_client(&server), &sync_config())
            .await
            .unwrap_err();

        assert_eq!(err.summary.pages, 1);
        assert_eq!(err.summary.written, 1);
        assert!(matches!(err.source, ShopifyError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_customer_failures_do_not_stop_the_run() {
        let server = MockServer::start().await;
        mount_page(&server, None, &[1, 2], false, 1).await;
        mount_consent(&server, 2, Some("SUBSCRIBED")).await;
        mount_update(&server, 1).await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "GetCustomerMarketingState",
                "variables": { "id": "gid://shopify/Customer/1" }
            })))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let summary = run_backfill(&test_client(&server), &sync_config()).await.unwrap();

        assert_eq!(summary.customers, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, 1);
    }
}
