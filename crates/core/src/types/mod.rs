//! Core types for the Facet marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod city;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use city::City;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError, RawPrice, parse_amount};
pub use status::*;
