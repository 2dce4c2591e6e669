//! Enumerated choices shared between checkout and the marketplace API.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Payment method offered at checkout.
///
/// The wire value is what the order API expects in `payment_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    Klarna,
    ApplePay,
    GooglePay,
    Cod,
    BankTransfer,
}

impl PaymentMethod {
    /// Every method, in the order the payment step lists them.
    pub const ALL: [Self; 7] = [
        Self::Card,
        Self::Paypal,
        Self::Klarna,
        Self::ApplePay,
        Self::GooglePay,
        Self::Cod,
        Self::BankTransfer,
    ];

    /// Value sent to the order API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::Klarna => "klarna",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
            Self::Cod => "cod",
            Self::BankTransfer => "bank_transfer",
        }
    }

    /// Human-readable label for the review step.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit / Debit Card",
            Self::Paypal => "PayPal",
            Self::Klarna => "Klarna",
            Self::ApplePay => "Apple Pay",
            Self::GooglePay => "Google Pay",
            Self::Cod => "Cash on Delivery",
            Self::BankTransfer => "Bank Transfer",
        }
    }

    /// Whether this method collects card details in the payment step.
    #[must_use]
    pub const fn collects_card_details(self) -> bool {
        matches!(self, Self::Card)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("payment method", s))
    }
}

/// Kind of saved shipping address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    #[default]
    Home,
    Other,
}

impl AddressType {
    /// Lowercase form used in order address objects.
    #[must_use]
    pub const fn as_order_type(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "HOME"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for AddressType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HOME" => Ok(Self::Home),
            "OTHER" => Ok(Self::Other),
            _ => Err(ParseEnumError::new("address type", s)),
        }
    }
}
