//! Terminal rendition of the checkout view.

use std::io::{BufRead, Write};

use facet_storefront::services::{CheckoutView, Route};
use tracing::{debug, info, warn};

use crate::commands::totals::breakdown;

/// Checkout view backed by the terminal.
///
/// Alerts and navigation are logged. Confirmations are asked on stderr and
/// answered from stdin, unless `assume_yes` was given.
#[derive(Debug, Clone, Copy)]
pub struct TerminalView {
    assume_yes: bool,
}

impl TerminalView {
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl CheckoutView for TerminalView {
    fn navigate(&self, route: Route) {
        match route {
            Route::Cart => info!("Your cart is empty"),
            Route::OrderConfirmation(confirmation) => {
                match &confirmation.order_id {
                    Some(order_id) => info!("Order {order_id} confirmed"),
                    None => info!("Order confirmed"),
                }
                for (label, value) in breakdown(&confirmation.totals) {
                    info!("{label:<10} {value}");
                }
            }
        }
    }

    fn scroll_to_top(&self) {
        debug!("Next checkout step");
    }

    fn alert(&self, message: &str) {
        warn!("{message}");
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stderr = std::io::stderr().lock();
        if write!(stderr, "{prompt} [y/N] ")
            .and_then(|()| stderr.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!(error = %e, "Could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(TerminalView::new(true).confirm("Delete?"));
    }
}
