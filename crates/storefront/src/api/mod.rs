//! Marketplace REST API client.
//!
//! Checkout talks to two resources of the marketplace backend:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | List addresses | `GET /api/addresses` |
//! | Create address | `POST /api/addresses` |
//! | Delete address | `DELETE /api/addresses/{id}` |
//! | Place order | `POST /api/orders/` |
//!
//! The backend is loosely typed, so response handling normalizes IDs, list
//! envelopes and error bodies before anything reaches checkout. The
//! [`AddressApi`] and [`OrderApi`] traits are the seams checkout is written
//! against; [`MarketplaceClient`] implements both over HTTP.

pub mod addresses;
pub mod client;
pub mod errors;
pub mod orders;

pub use addresses::{Address, AddressInput};
pub use client::MarketplaceClient;
pub use errors::extract_error_message;
pub use orders::{OrderAddress, OrderRequest, PlacedOrder};

use async_trait::async_trait;
use facet_core::AddressId;
use thiserror::Error;

/// Errors that can occur when calling the marketplace API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Most specific message found in the error body, if any.
        message: Option<String>,
    },

    /// The API answered 2xx but flagged the operation as failed.
    #[error("API rejected request: {}", .message.as_deref().unwrap_or("no details"))]
    Rejected {
        /// Most specific message found in the response body, if any.
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Message suitable for showing to the shopper.
    ///
    /// Uses the message the API sent when there is one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            }
            | Self::Rejected {
                message: Some(message),
            } => message.clone(),
            Self::RateLimited(seconds) => {
                format!("Too many requests, please try again in {seconds} seconds.")
            }
            _ => fallback.to_owned(),
        }
    }
}

/// Saved shipping addresses of the current user.
#[async_trait]
pub trait AddressApi: Send + Sync {
    /// Fetch every saved address.
    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError>;

    /// Create an address and return it with its server-assigned ID.
    async fn create_address(&self, input: &AddressInput) -> Result<Address, ApiError>;

    /// Delete an address.
    async fn delete_address(&self, id: &AddressId) -> Result<(), ApiError>;
}

/// Order creation.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Submit an order-creation request.
    async fn place_order(&self, request: &OrderRequest) -> Result<PlacedOrder, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 422,
            message: Some("shipping_method: field required".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "API returned 422: shipping_method: field required"
        );

        let err = ApiError::Rejected { message: None };
        assert_eq!(err.to_string(), "API rejected request: no details");
    }

    #[test]
    fn test_user_message_prefers_api_message() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Out of stock".to_string()),
        };
        assert_eq!(err.user_message("fallback"), "Out of stock");

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_user_message_rate_limited() {
        let err = ApiError::RateLimited(30);
        assert!(err.user_message("fallback").contains("30 seconds"));
    }
}
