//! Card details collected by the payment step.
//!
//! These fields live only in checkout state. They are never serialized and
//! never copied into the order request; wiring a payment processor is a
//! separate integration.

use secrecy::{ExposeSecret, SecretString};

/// Card fields as typed by the shopper.
#[derive(Clone)]
pub struct CardDetails {
    pub number: SecretString,
    pub holder_name: String,
    /// `MM/YY` as typed.
    pub expiry: String,
    pub cvv: SecretString,
}

impl CardDetails {
    /// Last four digits of the card number, if at least four were entered.
    #[must_use]
    pub fn last4(&self) -> Option<String> {
        let digits: Vec<char> = self
            .number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let start = digits.len().checked_sub(4)?;
        digits.get(start..).map(|tail| tail.iter().collect())
    }

    /// Masked number for the review step (e.g., `•••• 4242`).
    #[must_use]
    pub fn masked_number(&self) -> Option<String> {
        self.last4().map(|last4| format!("•••• {last4}"))
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &self.masked_number())
            .field("holder_name", &self.holder_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}
