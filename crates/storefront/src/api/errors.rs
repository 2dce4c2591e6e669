//! Error body normalization.
//!
//! Failed requests come back in several shapes depending on which backend
//! layer produced them:
//!
//! ```json
//! { "detail": [{ "loc": ["body", "shipping_method"], "msg": "field required" }] }
//! { "errors": { "city": ["is not supported"] } }
//! { "detail": "Address not found" }
//! { "message": "Cart is empty" }
//! ```
//!
//! [`extract_error_message`] picks the most specific message, in this order:
//! field-level validation list, `detail` string, `message` string.

use serde_json::Value;

/// Separator between multiple field-level messages.
const FIELD_SEPARATOR: &str = "; ";

/// Extract the most specific human-readable message from an error body.
///
/// Returns `None` when the body carries nothing usable; callers substitute
/// their own fallback.
#[must_use]
pub fn extract_error_message(body: &Value) -> Option<String> {
    field_errors(body)
        .or_else(|| non_blank(body.get("detail")))
        .or_else(|| non_blank(body.get("message")))
}

/// Field-level validation errors from `detail` (list form) or `errors`.
fn field_errors(body: &Value) -> Option<String> {
    let from_detail = body
        .get("detail")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(format_detail_item).collect::<Vec<_>>());

    let messages = match from_detail {
        Some(messages) if !messages.is_empty() => messages,
        _ => body.get("errors").map(format_errors).unwrap_or_default(),
    };

    if messages.is_empty() {
        None
    } else {
        Some(messages.join(FIELD_SEPARATOR))
    }
}

/// Format one `{ loc, msg }` validation entry as `field: msg`.
///
/// The leading `body` segment of `loc` names the request part, not the field,
/// and is dropped. Nested locations are joined with dots.
fn format_detail_item(item: &Value) -> Option<String> {
    if let Some(text) = item.as_str() {
        return non_blank_str(text);
    }

    let msg = item.get("msg").or_else(|| item.get("message"))?.as_str()?.trim();
    if msg.is_empty() {
        return None;
    }

    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|loc| {
            loc.iter()
                .skip_while(|segment| segment.as_str() == Some("body"))
                .map(|segment| match segment {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .unwrap_or_default();

    Some(if field.is_empty() {
        msg.to_owned()
    } else {
        format!("{field}: {msg}")
    })
}

/// Format an `errors` value: a list of strings or `{field, message}` objects,
/// or a map from field name to a message or list of messages.
fn format_errors(errors: &Value) -> Vec<String> {
    match errors {
        Value::Array(items) => items.iter().filter_map(format_error_entry).collect(),
        Value::Object(map) => map
            .iter()
            .flat_map(|(field, value)| {
                let messages: Vec<String> = match value {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(non_blank_str)
                        .collect(),
                    Value::String(s) => non_blank_str(s).into_iter().collect(),
                    _ => Vec::new(),
                };
                messages
                    .into_iter()
                    .map(move |msg| format!("{field}: {msg}"))
            })
            .collect(),
        Value::String(s) => non_blank_str(s).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn format_error_entry(entry: &Value) -> Option<String> {
    if let Some(text) = entry.as_str() {
        return non_blank_str(text);
    }
    let message = entry.get("message").or_else(|| entry.get("msg"))?.as_str()?;
    let message = non_blank_str(message)?;
    match entry.get("field").and_then(Value::as_str) {
        Some(field) if !field.trim().is_empty() => Some(format!("{field}: {message}")),
        _ => Some(message),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).and_then(non_blank_str)
}

fn non_blank_str(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
