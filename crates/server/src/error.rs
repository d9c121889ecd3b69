//! Unified error handling for HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{BackfillError, FavoritesError};
use crate::shopify::webhooks::WebhookVerifyError;

/// Application-level error type for the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or appending favorites failed.
    #[error("Favorites error: {0}")]
    Favorites(#[from] FavoritesError),

    /// The backfill stopped on a page fetch failure.
    #[error(transparent)]
    Backfill(#[from] BackfillError),

    /// Webhook signature did not verify.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] WebhookVerifyError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request clashes with work already in progress.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Favorites(
                FavoritesError::CustomerNotFound(_)
                | FavoritesError::ProductNotFound(_)
                | FavoritesError::NoVariants(_),
            )
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Favorites(_) | Self::Backfill(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Report server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use metasync_core::{CustomerId, ProductId};

    use super::*;
    use crate::shopify::ShopifyError;

    #[test]
    fn test_bad_input_is_400() {
        let cases = [
            AppError::BadRequest("missing productId".to_string()),
            AppError::Favorites(FavoritesError::CustomerNotFound(CustomerId::new(1))),
            AppError::Favorites(FavoritesError::ProductNotFound(ProductId::new(2))),
        ];
        for err in cases {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_bad_signature_is_401() {
        let response = AppError::Unauthorized(WebhookVerifyError::Mismatch).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_overlapping_backfill_is_409() {
        let err = AppError::Conflict("backfill already running".to_string());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upstream_failures_are_500() {
        let err = AppError::Favorites(FavoritesError::Shopify(ShopifyError::Status {
            status: 502,
            body: "upstream".to_string(),
        }));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::Favorites(FavoritesError::Shopify(ShopifyError::NotFound(
            "x".to_string(),
        )));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
