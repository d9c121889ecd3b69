//! Customer favorites stored in a JSON metafield.
//!
//! Appends are read-modify-write against Shopify with no locking, so two
//! concurrent appends for the same customer can lose one of the entries.

use metasync_core::{CustomerId, Favorite, FavoriteList, ProductId, VariantId, discount_percentage};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::shopify::{AdminClient, MetafieldInput, ProductDetail, ShopifyError};

/// Metafield namespace for favorites.
pub const FAVORITES_NAMESPACE: &str = "custom";
/// Metafield key for favorites.
pub const FAVORITES_KEY: &str = "favorites";
/// Metafield type for favorites.
pub const FAVORITES_TYPE: &str = "json";

/// Errors from reading or appending favorites.
#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("Favorites metafield is not a valid favorites list: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode favorites: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Product {0} has no variants")]
    NoVariants(ProductId),
}

/// A request to favorite a product, as sent by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    /// Product to favorite.
    pub product_id: ProductId,
    /// Variant the customer was viewing.
    pub variant_id: VariantId,
    /// Storefront URL of the product page.
    pub product_url: String,
}

/// Result of an append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The product was added; holds the list as written.
    Added(FavoriteList),
    /// The product was already a favorite; nothing was written.
    AlreadyPresent(FavoriteList),
}

impl AppendOutcome {
    /// Whether this append wrote a new entry.
    #[must_use]
    pub const fn was_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// The customer's favorites after the append.
    #[must_use]
    pub fn into_list(self) -> FavoriteList {
        match self {
            Self::Added(list) | Self::AlreadyPresent(list) => list,
        }
    }
}

/// Read a customer's favorites.
///
/// An unset (or blank) metafield is an empty list.
///
/// # Errors
///
/// Returns `FavoritesError::CustomerNotFound` for an unknown customer,
/// `FavoritesError::Decode` if the stored value is not a favorites list,
/// or `FavoritesError::Shopify` if the request fails.
#[instrument(skip(client), fields(customer_id = %customer_id))]
pub async fn get_favorites(
    client: &AdminClient,
    customer_id: CustomerId,
) -> Result<FavoriteList, FavoritesError> {
    let metafield = client
        .get_customer_metafield(customer_id, FAVORITES_NAMESPACE, FAVORITES_KEY)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                FavoritesError::CustomerNotFound(customer_id)
            } else {
                FavoritesError::Shopify(e)
            }
        })?;

    match metafield {
        Some(metafield) if !metafield.value.trim().is_empty() => {
            FavoriteList::from_json(&metafield.value).map_err(FavoritesError::Decode)
        }
        _ => Ok(FavoriteList::default()),
    }
}

/// Add a product to a customer's favorites.
///
/// A product that is already a favorite is left alone. Otherwise the
/// product is looked up, snapshotted into a [`Favorite`] and the whole
/// list is written back.
///
/// # Errors
///
/// Returns `FavoritesError::ProductNotFound` or `FavoritesError::NoVariants`
/// when the product cannot be snapshotted, plus any error from
/// [`get_favorites`] or the metafield write.
#[instrument(
    skip(client, request),
    fields(customer_id = %customer_id, product_id = %request.product_id)
)]
pub async fn add_favorite(
    client: &AdminClient,
    customer_id: CustomerId,
    request: FavoriteRequest,
) -> Result<AppendOutcome, FavoritesError> {
    let mut favorites = get_favorites(client, customer_id).await?;

    if favorites.contains(request.product_id) {
        info!("Product already in favorites");
        return Ok(AppendOutcome::AlreadyPresent(favorites));
    }

    let product = client.get_product(request.product_id).await.map_err(|e| {
        if e.is_not_found() {
            FavoritesError::ProductNotFound(request.product_id)
        } else {
            FavoritesError::Shopify(e)
        }
    })?;

    favorites.push_unique(snapshot(&product, request)?);

    let value = favorites.to_json().map_err(FavoritesError::Encode)?;
    client
        .set_customer_metafield(
            customer_id,
            MetafieldInput::new(FAVORITES_NAMESPACE, FAVORITES_KEY, FAVORITES_TYPE, value),
        )
        .await?;

    info!(favorites = favorites.len(), "Added product to favorites");
    Ok(AppendOutcome::Added(favorites))
}

/// Build the stored favorite from the product's current details.
fn snapshot(product: &ProductDetail, request: FavoriteRequest) -> Result<Favorite, FavoritesError> {
    let variant = product
        .variant_or_first(request.variant_id)
        .ok_or(FavoritesError::NoVariants(request.product_id))?;

    Ok(Favorite {
        product_id: request.product_id,
        variant_id: request.variant_id,
        product_url: request.product_url,
        title: product.title.clone(),
        image_url: product.image_url.clone(),
        price: variant.price,
        compare_at_price: variant.compare_at_price,
        discount_percentage: discount_percentage(variant.price, variant.compare_at_price),
        available: variant.available,
    })
}
