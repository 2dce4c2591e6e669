//! Presentation side effects driven by checkout.

use crate::checkout::OrderConfirmation;

/// Navigation targets checkout can send the shopper to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The cart page (checkout was opened with an empty cart).
    Cart,
    /// The order confirmation page.
    OrderConfirmation(OrderConfirmation),
}

/// The screen checkout renders into.
///
/// Implementations must not block for long: `confirm` is the only method
/// expected to wait on the shopper.
pub trait CheckoutView: Send + Sync {
    /// Navigate away from checkout.
    fn navigate(&self, route: Route);

    /// Scroll the viewport to the top.
    fn scroll_to_top(&self);

    /// Show a blocking alert.
    fn alert(&self, message: &str);

    /// Ask the shopper to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;
}
