//! Collaborators the checkout controller depends on.
//!
//! Checkout never reaches for ambient state. Everything it reads or drives
//! outside its own state is passed in through these ports:
//!
//! - [`CartSource`] - current cart lines (owned by the cart store)
//! - [`Identity`] - the shopper's contact email
//! - [`CheckoutView`] - navigation, scrolling, alerts and confirmations
//!
//! The address and order endpoints are ports too; see
//! [`crate::api::AddressApi`] and [`crate::api::OrderApi`].

pub mod cart;
pub mod identity;
pub mod view;

pub use cart::{CartLine, CartSource, MemoryCart};
pub use identity::{Identity, StaticIdentity};
pub use view::{CheckoutView, Route};
