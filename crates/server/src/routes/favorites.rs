//! Favorites API for storefront themes.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use metasync_core::{CustomerId, FavoriteList};
use tracing::instrument;

use crate::error::AppError;
use crate::services::{FavoriteRequest, add_favorite, get_favorites};
use crate::state::AppState;

/// Create favorites routes.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/customers/{customer_id}/favorites",
        get(list_favorites).post(append_favorite),
    )
}

fn parse_customer_id(raw: &str) -> Result<CustomerId, AppError> {
    raw.parse()
        .map_err(|e| AppError::BadRequest(format!("Invalid customer ID: {e}")))
}

/// List a customer's favorites.
#[instrument(skip(state))]
async fn list_favorites(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<FavoriteList>, AppError> {
    let customer_id = parse_customer_id(&customer_id)?;
    let favorites = get_favorites(state.shopify(), customer_id).await?;
    Ok(Json(favorites))
}

/// Add a product to a customer's favorites.
///
/// Answers 201 when the product was added and 200 when it was already
/// there, with the full list either way.
#[instrument(skip(state, payload))]
async fn append_favorite(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    payload: Result<Json<FavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FavoriteList>), AppError> {
    let customer_id = parse_customer_id(&customer_id)?;
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let outcome = add_favorite(state.shopify(), customer_id, request).await?;
    let status = if outcome.was_added() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(outcome.into_list())))
}
