//! Product lookups over the REST Admin API.

use std::str::FromStr;

use metasync_core::{ProductId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use super::{AdminClient, ProductDetail, ProductVariantDetail, ShopifyError};

/// `inventory_policy` value that allows selling past zero stock.
const INVENTORY_POLICY_CONTINUE: &str = "continue";

// =============================================================================
// REST response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    product: RestProduct,
}

#[derive(Debug, Deserialize)]
struct RestProduct {
    id: ProductId,
    title: String,
    image: Option<RestImage>,
    #[serde(default)]
    images: Vec<RestImage>,
    #[serde(default)]
    variants: Vec<RestVariant>,
}

#[derive(Debug, Deserialize)]
struct RestImage {
    src: String,
}

#[derive(Debug, Deserialize)]
struct RestVariant {
    id: VariantId,
    price: Decimal,
    #[serde(default, deserialize_with = "blank_decimal")]
    compare_at_price: Option<Decimal>,
    /// `None` when Shopify does not track stock for the variant.
    inventory_management: Option<String>,
    inventory_policy: Option<String>,
    #[serde(default)]
    inventory_quantity: i64,
}

/// Shopify sends `null` or `""` for an unset compare-at price.
fn blank_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Decimal::from_str(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl RestVariant {
    fn is_available(&self) -> bool {
        self.inventory_management.is_none()
            || self.inventory_policy.as_deref() == Some(INVENTORY_POLICY_CONTINUE)
            || self.inventory_quantity > 0
    }
}

impl From<RestProduct> for ProductDetail {
    fn from(product: RestProduct) -> Self {
        let image_url = product
            .image
            .or_else(|| product.images.into_iter().next())
            .map(|image| image.src);

        Self {
            id: product.id,
            title: product.title,
            image_url,
            variants: product
                .variants
                .into_iter()
                .map(|variant| ProductVariantDetail {
                    id: variant.id,
                    available: variant.is_available(),
                    price: variant.price,
                    compare_at_price: variant.compare_at_price,
                })
                .collect(),
        }
    }
}

impl AdminClient {
    /// Get a product with its variants and primary image.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the product does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<ProductDetail, ShopifyError> {
        let path = format!("products/{}.json", id.as_u64());

        match self.get_rest::<ProductEnvelope>(&path).await {
            Ok(envelope) => Ok(envelope.product.into()),
            Err(e) if e.is_not_found() => Err(ShopifyError::NotFound(format!("product {id}"))),
            Err(e) => Err(e),
        }
    }
}
