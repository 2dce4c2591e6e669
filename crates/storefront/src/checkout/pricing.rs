//! Order totals derived from the cart.
//!
//! Totals are a pure function of the cart lines and are recomputed whenever
//! checkout renders; nothing here is cached or persisted.

use facet_core::Price;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::services::CartLine;

/// Flat sales tax rate (7%), applied regardless of destination.
pub const TAX_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);

/// Subtotals strictly above this ship for free.
pub const FREE_DELIVERY_THRESHOLD: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Delivery fee charged below the free-delivery threshold.
pub const FLAT_DELIVERY_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Price breakdown shown on every checkout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub taxes: Decimal,
    pub delivery_fee: Decimal,
    pub grand_total: Decimal,
}

impl Totals {
    /// Totals of an empty cart.
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        taxes: Decimal::ZERO,
        delivery_fee: Decimal::ZERO,
        grand_total: Decimal::ZERO,
    };

    /// Compute totals for the given cart lines.
    ///
    /// A unit price that cannot be parsed counts as zero. So does a line
    /// whose amount would push the totals out of `Decimal` range.
    #[must_use]
    pub fn for_lines(lines: &[CartLine]) -> Self {
        lines.iter().fold(Self::ZERO, |totals, line| {
            line_amount(line)
                .and_then(|amount| totals.subtotal.checked_add(amount))
                .and_then(Self::checked_from_subtotal)
                .unwrap_or_else(|| {
                    tracing::warn!(
                        product = %line.product_ref,
                        quantity = line.quantity,
                        "Cart line total out of range, counting as zero"
                    );
                    totals
                })
        })
    }

    /// Compute taxes, delivery and grand total from a subtotal.
    ///
    /// Returns `None` if the grand total is not representable.
    #[must_use]
    pub fn checked_from_subtotal(subtotal: Decimal) -> Option<Self> {
        let taxes = subtotal.checked_mul(TAX_RATE)?;
        let delivery_fee = delivery_fee(subtotal);
        let grand_total = subtotal.checked_add(taxes)?.checked_add(delivery_fee)?;
        Some(Self {
            subtotal,
            taxes,
            delivery_fee,
            grand_total,
        })
    }

    /// Grand total as a displayable USD price.
    #[must_use]
    pub const fn grand_total_price(&self) -> Price {
        Price::usd(self.grand_total)
    }
}

/// Unit price times quantity, `None` on overflow.
fn line_amount(line: &CartLine) -> Option<Decimal> {
    let unit_price = line.unit_price.amount().unwrap_or_else(|e| {
        tracing::warn!(
            product = %line.product_ref,
            error = %e,
            "Unparseable cart price, counting as zero"
        );
        Decimal::ZERO
    });
    unit_price.checked_mul(Decimal::from(line.quantity))
}

/// Delivery fee for a subtotal.
///
/// Free for an empty order and for subtotals strictly above
/// [`FREE_DELIVERY_THRESHOLD`]; [`FLAT_DELIVERY_FEE`] otherwise.
#[must_use]
pub fn delivery_fee(subtotal: Decimal) -> Decimal {
    if subtotal.is_zero() || subtotal > FREE_DELIVERY_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_DELIVERY_FEE
    }
}
