//! Email marketing consent state.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Marketing consent state, as reported by Shopify's
/// `emailMarketingConsent.marketingState`.
///
/// The set of values is platform-defined. Values this crate does not know
/// about are kept verbatim in [`MarketingState::Other`] so they are written
/// to the metafield unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarketingState {
    /// Not subscribed to marketing.
    NotSubscribed,
    /// Pending confirmation.
    Pending,
    /// Subscribed to marketing.
    Subscribed,
    /// Unsubscribed from marketing.
    Unsubscribed,
    /// Data has been redacted.
    Redacted,
    /// Invalid state.
    Invalid,
    /// Any value not listed above.
    Other(String),
}

impl MarketingState {
    /// The platform's string for this state (e.g. `SUBSCRIBED`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotSubscribed => "NOT_SUBSCRIBED",
            Self::Pending => "PENDING",
            Self::Subscribed => "SUBSCRIBED",
            Self::Unsubscribed => "UNSUBSCRIBED",
            Self::Redacted => "REDACTED",
            Self::Invalid => "INVALID",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for MarketingState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NOT_SUBSCRIBED" => Self::NotSubscribed,
            "PENDING" => Self::Pending,
            "SUBSCRIBED" => Self::Subscribed,
            "UNSUBSCRIBED" => Self::Unsubscribed,
            "REDACTED" => Self::Redacted,
            "INVALID" => Self::Invalid,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for MarketingState {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<MarketingState> for String {
    fn from(state: MarketingState) -> Self {
        match state {
            MarketingState::Other(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for MarketingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
