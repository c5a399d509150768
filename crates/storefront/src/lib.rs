//! Caspian storefront core library.
//!
//! The storefront core behind a catalog-browsing shop frontend. It models
//! the upstream REST shop API, aggregates product-variation attributes into
//! selectable facets, resolves user selections to concrete variations,
//! matches category slugs across URL-encoding variants, and holds the
//! per-product-page session state the UI layer reads from.
//!
//! # Architecture
//!
//! - [`shop`] - Async REST client for the upstream shop API (cached)
//! - [`catalog`] - Pure data transformations: attribute aggregation,
//!   variation resolution, category tree lookup
//! - [`session`] - Owned per-product-page state (selection, cart-ready
//!   record, gallery)
//! - [`config`] - Environment-driven configuration
//!
//! Rendering, routing, and authentication belong to the embedding
//! application; this crate performs no I/O beyond the shop API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod html;
pub mod pricing;
pub mod session;
pub mod shop;
