//! Order creation wire types.

use facet_core::OrderId;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use super::errors::extract_error_message;

/// Order-creation request sent to `POST /api/orders/`.
///
/// Built once per submission by `checkout::payload::build_order_request` and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub billing_address: OrderAddress,
    pub shipping_address: OrderAddress,
    pub shipping_method: String,
    pub payment_method: String,
    pub notes: String,
    pub marketing_consent: bool,
}

/// Billing or shipping address inside an [`OrderRequest`].
///
/// `phone` and `email` are omitted from the JSON entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderAddress {
    #[serde(rename = "type")]
    pub address_type: String,
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Result of a successful order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Identifier of the new order, when the response carried one.
    pub order_id: Option<OrderId>,
}

/// Locations an order identifier has been seen at in order responses.
const ORDER_ID_PATHS: &[&[&str]] = &[
    &["order_id"],
    &["id"],
    &["order", "id"],
    &["order", "order_id"],
    &["data", "order_id"],
    &["data", "id"],
    &["order_number"],
];

/// Interpret a 2xx order response body.
///
/// A body with `"success": false` is a failure even on a success status.
///
/// # Errors
///
/// Returns [`ApiError::Rejected`] when the body explicitly signals failure.
pub(crate) fn interpret_order_response(body: &Value) -> Result<PlacedOrder, ApiError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Rejected {
            message: extract_error_message(body),
        });
    }

    Ok(PlacedOrder {
        order_id: extract_order_id(body),
    })
}

/// Find the order identifier, trying each known response shape in turn.
fn extract_order_id(body: &Value) -> Option<OrderId> {
    ORDER_ID_PATHS.iter().find_map(|path| {
        let value = path
            .iter()
            .try_fold(body, |current, key| current.get(*key))?;
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(OrderId::new(s.trim())),
            Value::Number(n) => Some(OrderId::new(n.to_string())),
            _ => None,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order_id(body: &Value) -> Option<String> {
        interpret_order_response(body)
            .unwrap()
            .order_id
            .map(|id| id.as_str().to_owned())
    }

    #[test]
    fn test_order_id_shapes() {
        assert_eq!(order_id(&json!({ "order_id": "ORD-1" })).as_deref(), Some("ORD-1"));
        assert_eq!(order_id(&json!({ "id": 42 })).as_deref(), Some("42"));
        assert_eq!(
            order_id(&json!({ "success": true, "order": { "id": "A7" } })).as_deref(),
            Some("A7")
        );
        assert_eq!(
            order_id(&json!({ "data": { "order_id": 9 } })).as_deref(),
            Some("9")
        );
        assert_eq!(
            order_id(&json!({ "order_number": "N-100" })).as_deref(),
            Some("N-100")
        );
    }

    #[test]
    fn test_order_id_prefers_order_id_over_id() {
        assert_eq!(
            order_id(&json!({ "id": 1, "order_id": "ORD-2" })).as_deref(),
            Some("ORD-2")
        );
    }

    #[test]
    fn test_missing_order_id_is_still_success() {
        assert_eq!(order_id(&json!({ "success": true })), None);
        assert_eq!(order_id(&Value::Null), None);
        assert_eq!(order_id(&json!({ "order_id": "  " })), None);
    }

    #[test]
    fn test_explicit_failure_is_rejected() {
        let err = interpret_order_response(&json!({
            "success": false,
            "message": "Payment method unavailable"
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Rejected { message: Some(ref m) } if m == "Payment method unavailable"
        ));
    }

    #[test]
    fn test_absent_optional_keys_are_omitted() {
        let address = OrderAddress {
            address_type: "home".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address_line1: "1 Gem St".to_string(),
            city: "Chicago".to_string(),
            state_province: "Chicago".to_string(),
            postal_code: "00000".to_string(),
            country_code: "US".to_string(),
            phone: None,
            email: Some("jane@facet.shop".to_string()),
        };
        let value = serde_json::to_value(&address).unwrap();
        assert!(value.get("phone").is_none());
        assert_eq!(value["email"], "jane@facet.shop");
        assert_eq!(value["type"], "home");
    }
}
