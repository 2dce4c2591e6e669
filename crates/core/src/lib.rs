//! Facet Core - Shared domain types.
//!
//! This crate provides the types shared by every Facet checkout component:
//! - `storefront` - Checkout controller and marketplace API client
//! - `cli` - Terminal driver for totals, addresses and checkout runs
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O and no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, loosely-typed prices, emails, payment methods,
//!   address types and the supported city list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
