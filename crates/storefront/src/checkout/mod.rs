//! Three-step checkout: address, payment, review.
//!
//! [`CheckoutController`] owns the wizard state and drives every side effect
//! through injected collaborators ([`CheckoutDeps`]). Totals are derived from
//! the cart on demand ([`pricing`]) and the order request is assembled by a
//! single mapping function ([`payload::build_order_request`]).
//!
//! # Flow
//!
//! 1. [`CheckoutController::mount`] redirects to the cart if it is empty,
//!    otherwise loads saved addresses and preselects the default one.
//! 2. [`CheckoutController::advance`] moves forward one step, only if the
//!    current step is complete.
//! 3. [`CheckoutController::place_order`] submits from the review step and
//!    navigates to the confirmation page on success.

pub mod card;
mod controller;
pub mod error;
pub mod form;
pub mod payload;
pub mod pricing;
pub mod state;

pub use card::CardDetails;
pub use controller::{CheckoutController, CheckoutDeps, MountOutcome};
pub use error::{CheckoutError, ValidationError};
pub use form::AddressForm;
pub use pricing::Totals;
pub use state::{
    CheckoutSnapshot, CheckoutState, CheckoutStep, OrderConfirmation, Phase, ReviewSummary,
};
