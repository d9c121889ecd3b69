//! Metasync server library.
//!
//! Keeps Shopify customer metafields in step with data Shopify does not
//! expose to storefront themes:
//! - `custom.marketing_state` mirrors the customer's email marketing consent,
//!   written on every `customers/create` webhook and by the backfill job
//! - `custom.favorites` holds the customer's favorited products, appended
//!   through the favorites API
//!
//! The crate is a library so the CLI and the integration tests share the
//! handlers and services with the `metasync-server` binary.
//!
//! # Security
//!
//! This crate holds a Shopify Admin API token that can read and write every
//! customer. Configure `SHOPIFY_WEBHOOK_SECRET` in production so forged
//! webhooks are rejected.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

#[cfg(test)]
mod test_support;
