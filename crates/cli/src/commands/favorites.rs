//! Favorites commands.

use metasync_core::{CustomerId, ProductId, VariantId};
use metasync_server::services::{AppendOutcome, FavoriteRequest, add_favorite, get_favorites};
use metasync_server::shopify::AdminClient;

use super::{CommandError, print_json};

/// Print a customer's favorites.
pub async fn list(client: &AdminClient, customer_id: CustomerId) -> Result<(), CommandError> {
    let favorites = get_favorites(client, customer_id).await?;
    print_json(&favorites)
}

/// Add a favorite and print the resulting list.
pub async fn add(
    client: &AdminClient,
    customer_id: CustomerId,
    product_id: ProductId,
    variant_id: VariantId,
    product_url: String,
) -> Result<(), CommandError> {
    let request = FavoriteRequest {
        product_id,
        variant_id,
        product_url,
    };

    let outcome = add_favorite(client, customer_id, request).await?;
    if let AppendOutcome::AlreadyPresent(_) = &outcome {
        tracing::info!("Product {product_id} is already a favorite");
    }

    print_json(&outcome.into_list())
}
