//! Metasync Core - Shared types library.
//!
//! This crate provides the domain types used by every Metasync component:
//! - `server` - Webhook receiver, favorites API and backfill trigger
//! - `cli` - Command-line tools for running syncs by hand
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. All persistent state lives in Shopify metafields; these types
//! describe what is stored there and how IDs are addressed.
//!
//! # Modules
//!
//! - [`types`] - Shopify IDs, marketing consent state and customer favorites

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
