//! Newtype IDs for Shopify resources.
//!
//! Shopify addresses resources in two forms: the bare numeric ID used by
//! the REST API and webhook payloads (`"7421"`), and the global ID used by
//! GraphQL (`"gid://shopify/Customer/7421"`). The `define_gid!` macro
//! creates wrappers that accept either form and render both, so IDs from
//! different resource types cannot be mixed up.

use serde::de;

/// Prefix shared by every Shopify global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a Shopify ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("id cannot be empty")]
    Empty,
    /// The input is a global ID for a different resource type.
    #[error("expected a {expected} id, got `{input}`")]
    WrongResource {
        /// Resource type the caller asked for.
        expected: &'static str,
        /// The rejected input.
        input: String,
    },
    /// The numeric part is not an unsigned integer.
    #[error("invalid numeric id: `{0}`")]
    InvalidNumber(String),
}

/// Parse a numeric or global ID for `resource` into its numeric value.
///
/// Used by the `define_gid!` expansion; prefer the generated `parse`.
///
/// # Errors
///
/// Returns an [`IdError`] if the input is empty, names another resource
/// type, or has a non-numeric ID part.
#[doc(hidden)]
pub fn parse_gid(input: &str, resource: &'static str) -> Result<u64, IdError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty);
    }

    let numeric = match trimmed.strip_prefix(GID_PREFIX) {
        Some(rest) => {
            let wrong_resource = || IdError::WrongResource {
                expected: resource,
                input: input.to_owned(),
            };
            let (kind, number) = rest.split_once('/').ok_or_else(wrong_resource)?;
            if kind != resource {
                return Err(wrong_resource());
            }
            // GIDs may carry a query string (e.g. `?inventory_item_id=1`)
            number.split('?').next().unwrap_or(number)
        }
        None => trimmed,
    };

    numeric
        .parse::<u64>()
        .map_err(|_| IdError::InvalidNumber(input.to_owned()))
}

/// Serde visitor accepting an ID as either a JSON number or a string.
#[doc(hidden)]
pub struct GidVisitor {
    /// Resource type expected by the target ID.
    pub resource: &'static str,
}

impl de::Visitor<'_> for GidVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "a numeric or gid://shopify/{}/ id", self.resource)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::custom(IdError::InvalidNumber(v.to_string())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        parse_gid(v, self.resource).map_err(E::custom)
    }
}

/// Macro to define a type-safe Shopify ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `parse()` / `FromStr` accepting `"123"` or `"gid://shopify/{Resource}/123"`
/// - `to_gid()` rendering the GraphQL global ID
/// - `Display` rendering the bare numeric ID
/// - `Serialize` as the numeric ID string, `Deserialize` from a number,
///   numeric string or global ID
///
/// # Example
///
/// ```rust
/// # use metasync_core::define_gid;
/// define_gid!(OrderId, "Order");
///
/// let id: OrderId = "gid://shopify/Order/42".parse().unwrap();
/// assert_eq!(id.as_u64(), 42);
/// assert_eq!(id.to_gid(), "gid://shopify/Order/42");
/// assert!("gid://shopify/Customer/42".parse::<OrderId>().is_err());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Shopify resource type name used in global IDs.
            pub const RESOURCE: &'static str = $resource;

            /// Create an ID from its numeric value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying numeric value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            /// Render the GraphQL global ID.
            #[must_use]
            pub fn to_gid(&self) -> String {
                format!("{}{}/{}", $crate::types::id::GID_PREFIX, $resource, self.0)
            }

            /// Parse a numeric or global ID.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is empty, is a global ID for a
            /// different resource, or is not numeric.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                $crate::types::id::parse_gid(s, $resource).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                deserializer
                    .deserialize_any($crate::types::id::GidVisitor {
                        resource: $resource,
                    })
                    .map(Self)
            }
        }
    };
}

define_gid!(CustomerId, "Customer");
define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
