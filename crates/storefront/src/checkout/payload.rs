//! Mapping from checkout selections to the order-creation request.
//!
//! Every default the order API relies on is named here. Some of them paper
//! over fields the address form never collects:
//!
//! - `state_province` repeats the city (the form has no state field)
//! - `postal_code` is a fixed placeholder (the form has no postal code)
//! - `country_code` is always `US`, whatever country the address stores
//!
//! The last one is probably wrong for non-US addresses, but backend
//! validation may depend on it, so it is kept until the API contract says
//! otherwise.

use facet_core::PaymentMethod;

use crate::api::{Address, OrderAddress, OrderRequest};
use crate::services::Identity;

/// First name used when the address name is blank.
pub const DEFAULT_FIRST_NAME: &str = "Customer";
/// Last name used when the address name has a single word.
pub const DEFAULT_LAST_NAME: &str = "User";
/// Street line used when the saved address has none.
pub const ADDRESS_LINE_PLACEHOLDER: &str = "Address not provided";
/// Postal code sent for every address.
pub const POSTAL_CODE_PLACEHOLDER: &str = "00000";
/// Country code sent for every address.
pub const ORDER_COUNTRY_CODE: &str = "US";
/// Shipping method sent for every order.
pub const SHIPPING_METHOD: &str = "standard";
/// Payment method sent if none was selected.
pub const DEFAULT_PAYMENT_METHOD: &str = "cash_on_delivery";
/// Notes attached to every order.
pub const ORDER_NOTES: &str = "Order placed via web checkout";

/// Split a full name into first and last name.
///
/// The first whitespace-separated word is the first name; the remaining words
/// joined by single spaces are the last name. Missing parts fall back to
/// [`DEFAULT_FIRST_NAME`] and [`DEFAULT_LAST_NAME`].
///
/// ```
/// use facet_storefront::checkout::payload::split_name;
///
/// assert_eq!(split_name("Jane Mary Doe"), ("Jane".into(), "Mary Doe".into()));
/// assert_eq!(split_name("Solo"), ("Solo".into(), "User".into()));
/// assert_eq!(split_name(""), ("Customer".into(), "User".into()));
/// ```
#[must_use]
pub fn split_name(full_name: &str) -> (String, String) {
    let mut words = full_name.split_whitespace();
    let first = words.next().unwrap_or(DEFAULT_FIRST_NAME).to_owned();
    let rest = words.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() {
        DEFAULT_LAST_NAME.to_owned()
    } else {
        rest
    };
    (first, last)
}

/// Contact email for the order: the signed-in user's, else the cached one.
#[must_use]
pub fn contact_email(identity: &dyn Identity) -> Option<String> {
    non_blank(identity.user_email()).or_else(|| non_blank(identity.cached_email()))
}

/// Build the order-creation request.
///
/// Billing and shipping addresses are identical. `phone` and `email` are
/// only attached when non-blank after trimming.
#[must_use]
pub fn build_order_request(
    address: &Address,
    payment: Option<PaymentMethod>,
    email: Option<String>,
) -> OrderRequest {
    let (first_name, last_name) = split_name(&address.name);

    let address_line1 = match address.line1.trim() {
        "" => ADDRESS_LINE_PLACEHOLDER.to_owned(),
        line => line.to_owned(),
    };

    let order_address = OrderAddress {
        address_type: address.address_type.as_order_type().to_owned(),
        first_name,
        last_name,
        address_line1,
        city: address.city.clone(),
        state_province: address.city.clone(),
        postal_code: POSTAL_CODE_PLACEHOLDER.to_owned(),
        country_code: ORDER_COUNTRY_CODE.to_owned(),
        phone: non_blank(Some(address.phone.clone())),
        email: non_blank(email),
    };

    OrderRequest {
        billing_address: order_address.clone(),
        shipping_address: order_address,
        shipping_method: SHIPPING_METHOD.to_owned(),
        payment_method: payment
            .map_or(DEFAULT_PAYMENT_METHOD, PaymentMethod::as_str)
            .to_owned(),
        notes: ORDER_NOTES.to_owned(),
        marketing_consent: false,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
