//! Checkout error types.

use facet_core::AddressId;
use thiserror::Error;

use crate::api::ApiError;

/// Local validation failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a shipping address")]
    MissingAddress,

    #[error("Please select a payment method")]
    MissingPayment,

    #[error("Address {0} is not in your saved addresses")]
    UnknownAddress(AddressId),

    #[error("Please review your order before placing it")]
    NotAtReview,

    #[error("Please enter the recipient's {0}")]
    MissingField(&'static str),

    #[error("We do not deliver to {0} yet")]
    UnsupportedCity(String),
}

/// Errors returned by checkout controller operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A step precondition or form constraint was not met.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An address request failed.
    #[error("Address request failed: {0}")]
    Api(#[from] ApiError),

    /// The order API refused or failed the order.
    #[error("Order placement failed: {message}")]
    OrderFailed {
        /// Message shown to the shopper.
        message: String,
        #[source]
        source: ApiError,
    },

    /// An order submission is already outstanding.
    #[error("An order submission is already in progress")]
    SubmissionInFlight,

    /// This checkout already placed its order.
    #[error("This order has already been placed")]
    AlreadySubmitted,

    /// The shopper left checkout before the operation finished.
    #[error("Checkout was abandoned")]
    Abandoned,
}
