//! Type-safe price representation using decimal arithmetic.
//!
//! Cart lines reach checkout in whatever shape the catalog produced them:
//! a JSON number (`1200`), a plain numeric string (`"1200.00"`) or a
//! currency-formatted string (`"$1,200.00"`). [`RawPrice`] keeps the raw
//! value and [`parse_amount`] normalizes it into a [`Decimal`].

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a price.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Nothing numeric was left after stripping formatting.
    #[error("price is empty")]
    Empty,
    /// The remaining characters do not form a decimal number.
    #[error("invalid price: {0:?}")]
    Invalid(String),
}

/// Parse a possibly currency-formatted amount.
///
/// Currency symbols, thousands separators, whitespace and any other
/// characters outside `0-9 . -` are stripped before parsing.
///
/// ```
/// use facet_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("$1,200.00").unwrap(), Decimal::new(120_000, 2));
/// assert_eq!(parse_amount(" 75 ").unwrap(), Decimal::from(75));
/// assert!(parse_amount("free").is_err());
/// ```
///
/// # Errors
///
/// Returns [`PriceError::Empty`] if no digits remain, or
/// [`PriceError::Invalid`] if the remainder is not a decimal number.
pub fn parse_amount(raw: &str) -> Result<Decimal, PriceError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return Err(PriceError::Empty);
    }

    Decimal::from_str(&cleaned).map_err(|_| PriceError::Invalid(raw.to_owned()))
}

/// A unit price exactly as the cart store supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    /// Numeric amount.
    Amount(Decimal),
    /// Currency-formatted text such as `"$1,200.00"`.
    Formatted(String),
}

impl RawPrice {
    /// Resolve to a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if a formatted price cannot be parsed.
    pub fn amount(&self) -> Result<Decimal, PriceError> {
        match self {
            Self::Amount(amount) => Ok(*amount),
            Self::Formatted(text) => parse_amount(text),
        }
    }
}

impl From<Decimal> for RawPrice {
    fn from(amount: Decimal) -> Self {
        Self::Amount(amount)
    }
}

impl From<&str> for RawPrice {
    fn from(text: &str) -> Self {
        Self::Formatted(text.to_owned())
    }
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a US dollar price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }
}

impl fmt::Display for Price {
    /// Format for display, rounded to cents (e.g., `$2618.00`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}
