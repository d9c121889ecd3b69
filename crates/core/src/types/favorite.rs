//! Customer product favorites.
//!
//! Favorites are stored as a JSON array in a customer metafield. Each entry
//! is a snapshot of the product taken when it was favorited, so storefront
//! themes can render the list without looking every product up again.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};

/// A favorited product, enriched with the product details at the time it
/// was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// Favorited product.
    pub product_id: ProductId,
    /// Variant the customer was looking at.
    pub variant_id: VariantId,
    /// Storefront URL of the product page.
    #[serde(default)]
    pub product_url: String,
    /// Product title.
    #[serde(default)]
    pub title: String,
    /// Primary product image, if the product has one.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Variant price.
    #[serde(default)]
    pub price: Decimal,
    /// Variant compare-at price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,
    /// Whole-number discount of `price` against `compare_at_price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u8>,
    /// Whether the variant can currently be purchased.
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

/// Compute the whole-number discount percentage of `price` against
/// `compare_at_price`.
///
/// Returns `None` unless the compare-at price is positive and strictly
/// greater than the price. Halves round away from zero, so a discount
/// below half a percent is `Some(0)`.
///
/// ```
/// use metasync_core::discount_percentage;
/// use rust_decimal::Decimal;
///
/// let price = Decimal::new(7500, 2);
/// assert_eq!(discount_percentage(price, Some(Decimal::new(10000, 2))), Some(25));
/// assert_eq!(discount_percentage(price, Some(price)), None);
/// assert_eq!(discount_percentage(price, None), None);
/// ```
#[must_use]
pub fn discount_percentage(price: Decimal, compare_at_price: Option<Decimal>) -> Option<u8> {
    let compare_at = compare_at_price?;
    if compare_at <= Decimal::ZERO || compare_at <= price {
        return None;
    }

    ((compare_at - price) / compare_at * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
}

/// The decoded contents of a customer's favorites metafield.
///
/// Holds at most one entry per product; use [`FavoriteList::push_unique`]
/// to add entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteList(Vec<Favorite>);

impl FavoriteList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Decode the metafield's JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON array of favorites.
    pub fn from_json(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }

    /// Encode the list as the metafield's JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether the list already holds `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.0.iter().any(|f| f.product_id == product_id)
    }

    /// Append `favorite` unless its product is already present.
    ///
    /// Returns `true` if the favorite was added.
    pub fn push_unique(&mut self, favorite: Favorite) -> bool {
        if self.contains(favorite.product_id) {
            return false;
        }
        self.0.push(favorite);
        true
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the favorites in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Favorite> {
        self.0.iter()
    }

}

impl<'a> IntoIterator for &'a FavoriteList {
    type Item = &'a Favorite;
    type IntoIter = std::slice::Iter<'a, Favorite>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
