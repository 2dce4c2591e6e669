//! Sentry integration for checkout errors.
//!
//! Checkout errors are scoped to a single shopper action and surfaced through
//! the view, never propagated as fatal. Failures that point at the backend or
//! the network are additionally captured to Sentry, and each checkout step
//! leaves a breadcrumb so captured events show how the shopper got there.

use crate::api::ApiError;

/// Capture an API error to Sentry and log it.
///
/// Client-side problems (rate limiting, 4xx validation) are logged at `warn`
/// without an event, since they are expected during normal checkout use.
pub fn report_api_error(context: &str, error: &ApiError) {
    let server_side = match error {
        ApiError::Status { status, .. } => *status >= 500,
        ApiError::RateLimited(_) | ApiError::Rejected { .. } => false,
        ApiError::Http(_) | ApiError::Parse(_) | ApiError::InvalidUrl(_) => true,
    };

    if server_side {
        let event_id = sentry::capture_error(error);
        tracing::error!(
            error = %error,
            sentry_event_id = %event_id,
            "{context} failed"
        );
    } else {
        tracing::warn!(error = %error, "{context} failed");
    }
}

/// Set the Sentry user context from the shopper's email.
///
/// Call this once the identity is known so errors are associated with it.
pub fn set_sentry_user(email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(email.map(|email| sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for a checkout action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of shopper
/// actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Advanced to payment step", Some(&[("step", "2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
