//! Domain types for the Shopify Admin API.
//!
//! These types provide a clean API separate from the raw GraphQL and REST
//! response shapes in [`super::queries`] and the REST module.

use metasync_core::{CustomerId, MarketingState, ProductId, VariantId};
use rust_decimal::Decimal;
use serde::Serialize;

// =============================================================================
// Customer Types
// =============================================================================

/// A customer's email marketing consent, as currently stored by Shopify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerConsent {
    /// Customer ID.
    pub id: CustomerId,
    /// Email address (absent for phone-only customers).
    pub email: Option<String>,
    /// Marketing state, if Shopify has one for this customer.
    pub marketing_state: Option<MarketingState>,
}

/// Minimal customer listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    /// Customer ID.
    pub id: CustomerId,
    /// Email address.
    pub email: Option<String>,
}

/// A customer with the pagination cursor pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEdge {
    /// Opaque cursor; pass as `after` to continue past this customer.
    pub cursor: String,
    /// The customer.
    pub customer: CustomerSummary,
}

/// One page of the customer listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPage {
    /// Customers on this page, in listing order.
    pub edges: Vec<CustomerEdge>,
    /// Whether Shopify reports more pages after this one.
    pub has_next_page: bool,
}

impl CustomerPage {
    /// Cursor of the last customer on the page.
    #[must_use]
    pub fn last_cursor(&self) -> Option<&str> {
        self.edges.last().map(|edge| edge.cursor.as_str())
    }
}

// =============================================================================
// Metafield Types
// =============================================================================

/// A stored metafield value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metafield {
    /// Metafield ID.
    pub id: String,
    /// The raw metafield value.
    pub value: String,
}

/// Input for creating/updating a metafield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetafieldInput {
    /// Namespace for the metafield.
    pub namespace: String,
    /// Key within the namespace.
    pub key: String,
    /// The value to store.
    pub value: String,
    /// The metafield type (e.g., `single_line_text_field`, `json`).
    pub type_: String,
}

impl MetafieldInput {
    /// Build a metafield input.
    #[must_use]
    pub fn new(namespace: &str, key: &str, type_: &str, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value: value.into(),
            type_: type_.to_string(),
        }
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// Product details used to enrich a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Primary image URL.
    pub image_url: Option<String>,
    /// Variants in display order.
    pub variants: Vec<ProductVariantDetail>,
}

impl ProductDetail {
    /// The variant with `id`, or the first variant if there is no match.
    #[must_use]
    pub fn variant_or_first(&self, id: VariantId) -> Option<&ProductVariantDetail> {
        self.variants
            .iter()
            .find(|variant| variant.id == id)
            .or_else(|| self.variants.first())
    }
}

/// Pricing and availability for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVariantDetail {
    /// Variant ID.
    pub id: VariantId,
    /// Current price.
    pub price: Decimal,
    /// Compare-at ("was") price.
    pub compare_at_price: Option<Decimal>,
    /// Whether the variant can be purchased right now.
    pub available: bool,
}

// =============================================================================
// Webhook Types
// =============================================================================

/// A registered webhook subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookSubscription {
    /// Subscription ID.
    pub id: String,
    /// Topic (e.g., `CUSTOMERS_CREATE`).
    pub topic: String,
    /// Callback URL for HTTP endpoints.
    pub callback_url: Option<String>,
}
