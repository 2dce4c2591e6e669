//! Cart price breakdown.

use std::path::Path;

use facet_core::Price;
use facet_storefront::checkout::Totals;
use facet_storefront::services::CartLine;
use rust_decimal::Decimal;
use tracing::info;

use super::{CommandError, load_cart};

/// Print the totals for a cart file.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read or parsed.
pub async fn show(path: &Path) -> Result<(), CommandError> {
    let lines = load_cart(path).await?;
    let totals = Totals::for_lines(&lines);

    for line in &lines {
        info!("  {}", describe_line(line));
    }
    for (label, value) in breakdown(&totals) {
        info!("{label:<10} {value}");
    }

    Ok(())
}

fn describe_line(line: &CartLine) -> String {
    let price = line
        .unit_price
        .amount()
        .map_or_else(|_| "price unavailable".to_owned(), |a| Price::usd(a).to_string());
    format!("{} x{} @ {price}", line.display_name, line.quantity)
}

/// Labelled rows of the price breakdown, in display order.
pub(crate) fn breakdown(totals: &Totals) -> [(&'static str, String); 4] {
    let delivery = if totals.delivery_fee == Decimal::ZERO {
        "Free".to_owned()
    } else {
        Price::usd(totals.delivery_fee).to_string()
    };

    [
        ("Subtotal", Price::usd(totals.subtotal).to_string()),
        ("Taxes", Price::usd(totals.taxes).to_string()),
        ("Delivery", delivery),
        ("Total", totals.grand_total_price().to_string()),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_marks_free_delivery() {
        let [_, _, delivery, total] = breakdown(&Totals::checked_from_subtotal(Decimal::from(6000)).unwrap());
        assert_eq!(delivery, ("Delivery", "Free".to_owned()));
        assert_eq!(total, ("Total", "$6420.00".to_owned()));

        let [_, taxes, delivery, total] = breakdown(&Totals::checked_from_subtotal(Decimal::from(100)).unwrap());
        assert_eq!(taxes, ("Taxes", "$7.00".to_owned()));
        assert_eq!(delivery, ("Delivery", "$50.00".to_owned()));
        assert_eq!(total, ("Total", "$157.00".to_owned()));
    }
}
