//! Facet Storefront checkout library.
//!
//! This crate provides the checkout core of the Facet marketplace client as
//! a library, so it can be driven by any front end and tested without one.
//!
//! # Modules
//!
//! - [`api`] - REST client for the marketplace address and order endpoints
//! - [`checkout`] - Three-step checkout controller, pricing and order payload
//! - [`services`] - Ports for the collaborators checkout depends on (cart,
//!   identity, view)
//! - [`config`] - Environment configuration
//! - [`error`] - Sentry reporting helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod services;
