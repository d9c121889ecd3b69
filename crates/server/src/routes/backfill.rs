//! Backfill trigger.

use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::error::AppError;
use crate::services::{BackfillSummary, run_backfill};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct BackfillResponse {
    message: &'static str,
    summary: BackfillSummary,
}

/// Create backfill routes.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/backfill",
        post(trigger_backfill).fallback(method_not_allowed),
    )
}

/// Run the consent backfill to completion.
///
/// The response is sent only once every customer has been processed, which
/// can outlast proxy timeouts on large stores; the CLI `backfill` command
/// has no such limit. A second trigger while one is running gets `409`.
#[instrument(skip(state))]
async fn trigger_backfill(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let Some(_guard) = state.try_begin_backfill() else {
        warn!("Backfill already running, rejecting trigger");
        return Err(AppError::Conflict("backfill already running".to_string()));
    };

    let summary = run_backfill(state.shopify(), &state.config().sync).await?;

    Ok(Json(BackfillResponse {
        message: "Backfill complete",
        summary,
    }))
}

async fn method_not_allowed(method: Method) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(serde_json::json!({ "error": format!("Method {method} not allowed") })),
    )
}
