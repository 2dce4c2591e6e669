//! Terminal checkout: address, payment, review, place order.
//!
//! # Usage
//!
//! ```bash
//! # Ship to the default address, pay on delivery, confirm interactively
//! facet checkout --cart cart.json --payment cod
//!
//! # Pick an address and skip the confirmation
//! facet checkout --cart cart.json --payment paypal --address 12 --yes
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use facet_core::{AddressId, Email, PaymentMethod};
use facet_storefront::api::MarketplaceClient;
use facet_storefront::checkout::payload::contact_email;
use facet_storefront::checkout::{CheckoutController, CheckoutDeps, MountOutcome, ReviewSummary};
use facet_storefront::config::StorefrontConfig;
use facet_storefront::error::set_sentry_user;
use facet_storefront::services::{CheckoutView, MemoryCart, StaticIdentity};
use tracing::info;

use super::totals::breakdown;
use super::{CommandError, load_cart};
use crate::terminal::TerminalView;

#[derive(Args)]
pub struct CheckoutArgs {
    /// Cart file (JSON array of cart lines)
    #[arg(short, long)]
    cart: PathBuf,

    /// Payment method (`card`, `paypal`, `klarna`, `apple_pay`, `google_pay`,
    /// `cod`, `bank_transfer`)
    #[arg(short, long)]
    payment: PaymentMethod,

    /// Saved address to ship to (default: the default address)
    #[arg(short, long)]
    address: Option<AddressId>,

    /// Contact email for the order
    #[arg(short, long)]
    email: Option<Email>,

    /// Place the order without asking
    #[arg(short, long)]
    yes: bool,
}

/// Run checkout for a cart file.
///
/// # Errors
///
/// Returns an error if the cart is empty or unreadable, a step cannot be
/// completed, or the order is not accepted.
pub async fn run(config: &StorefrontConfig, args: CheckoutArgs) -> Result<(), CommandError> {
    let lines = load_cart(&args.cart).await?;
    let client = Arc::new(MarketplaceClient::new(&config.api)?);

    let identity = StaticIdentity {
        user_email: args.email.map(|email| email.to_string()),
        cached_email: config.customer_email.as_ref().map(ToString::to_string),
    };
    set_sentry_user(contact_email(&identity).as_deref());

    let view = Arc::new(TerminalView::new(args.yes));
    let controller = CheckoutController::new(CheckoutDeps {
        addresses: client.clone(),
        orders: client,
        cart: Arc::new(MemoryCart::new(lines)),
        identity: Arc::new(identity),
        view: view.clone(),
    });

    if controller.mount().await? == MountOutcome::RedirectedToCart {
        return Err(CommandError::EmptyCart);
    }

    if let Some(id) = args.address {
        controller.select_address(id).await?;
    }
    controller.advance().await?;

    controller.select_payment(args.payment).await?;
    controller.advance().await?;

    log_review(&controller.review_summary().await);
    if !view.confirm("Place this order?") {
        info!("Order not placed");
        controller.abandon().await;
        return Ok(());
    }

    controller.place_order().await?;
    Ok(())
}

fn log_review(summary: &ReviewSummary) {
    if let Some(address) = &summary.address {
        info!(
            "Ship to: {}, {}, {} ({})",
            address.name, address.line1, address.city, address.phone
        );
    }
    if let Some(payment) = summary.payment {
        match &summary.card {
            Some(card) => info!("Payment: {} {card}", payment.label()),
            None => info!("Payment: {}", payment.label()),
        }
    }
    for line in &summary.lines {
        info!("  {} x{}", line.display_name, line.quantity);
    }
    for (label, value) in breakdown(&summary.totals) {
        info!("{label:<10} {value}");
    }
}
