//! Core types for Metasync.
//!
//! This module provides type-safe wrappers for the domain concepts that
//! travel between Shopify and the customer metafields.

pub mod favorite;
pub mod id;
pub mod marketing;

pub use favorite::{Favorite, FavoriteList, discount_percentage};
pub use id::*;
pub use marketing::MarketingState;
