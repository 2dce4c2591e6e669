//! Checkout wizard state.

use facet_core::{AddressId, OrderId, PaymentMethod};

use super::card::CardDetails;
use super::error::ValidationError;
use super::pricing::Totals;
use crate::api::Address;
use crate::services::CartLine;

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CheckoutStep {
    #[default]
    Address = 1,
    Payment = 2,
    Review = 3,
}

impl CheckoutStep {
    /// 1-based step number, as shown in the progress indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// The step after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Address => Some(Self::Payment),
            Self::Payment => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// Step title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Address => "Shipping Address",
            Self::Payment => "Payment Method",
            Self::Review => "Review Order",
        }
    }
}

/// Lifecycle of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Shopper is working through the steps.
    #[default]
    Active,
    /// An order request is outstanding.
    Submitting,
    /// The order was placed; the session is finished.
    Submitted,
    /// The shopper left checkout.
    Abandoned,
}

/// Mutable state owned by the checkout controller.
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    pub step: CheckoutStep,
    pub phase: Phase,
    pub selected_address_id: Option<AddressId>,
    pub selected_payment: Option<PaymentMethod>,
    pub card_details: Option<CardDetails>,
    pub addresses: Vec<Address>,
}

impl CheckoutState {
    /// The selected address, if it is still in the list.
    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        let id = self.selected_address_id.as_ref()?;
        self.addresses.iter().find(|a| &a.id == id)
    }

    /// Pick the address to select after the list is (re)loaded: the default
    /// one, else the first, else none.
    pub(crate) fn select_preferred_address(&mut self) {
        self.selected_address_id = self
            .addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.addresses.first())
            .map(|a| a.id.clone());
    }

    /// After a reload, keep the current selection if it survived, else pick
    /// the preferred address.
    pub(crate) fn reconcile_selection(&mut self) {
        if self.selected_address().is_none() {
            self.select_preferred_address();
        }
    }

    /// Select one of the loaded addresses.
    pub(crate) fn select_address(&mut self, id: AddressId) -> Result<(), ValidationError> {
        if !self.addresses.iter().any(|a| a.id == id) {
            return Err(ValidationError::UnknownAddress(id));
        }
        self.selected_address_id = Some(id);
        Ok(())
    }

    /// Remove a deleted address. A removed selection moves to the first
    /// remaining address.
    pub(crate) fn remove_address(&mut self, id: &AddressId) {
        self.addresses.retain(|a| &a.id != id);
        if self.selected_address_id.as_ref() == Some(id) {
            self.selected_address_id = self.addresses.first().map(|a| a.id.clone());
        }
    }

    /// Move to the next step if the current one is complete.
    ///
    /// Returns the step moved to, or `None` at the review step, where the
    /// only way forward is placing the order.
    pub(crate) fn advance(&mut self) -> Result<Option<CheckoutStep>, ValidationError> {
        match self.step {
            CheckoutStep::Address if self.selected_address().is_none() => {
                return Err(ValidationError::MissingAddress);
            }
            CheckoutStep::Payment if self.selected_payment.is_none() => {
                return Err(ValidationError::MissingPayment);
            }
            _ => {}
        }

        let next = self.step.next();
        if let Some(next) = next {
            self.step = next;
        }
        Ok(next)
    }

    /// Jump back to an earlier step. Forward jumps are ignored.
    pub(crate) fn go_back_to(&mut self, step: CheckoutStep) -> CheckoutStep {
        if step < self.step {
            self.step = step;
        }
        self.step
    }

    /// Drop everything the shopper entered, keeping only the phase.
    pub(crate) fn discard(&mut self, phase: Phase) {
        *self = Self {
            phase,
            ..Self::default()
        };
    }
}

/// Point-in-time view of checkout for rendering.
#[derive(Debug, Clone)]
pub struct CheckoutSnapshot {
    pub state: CheckoutState,
    pub totals: Totals,
    /// Whether any request is outstanding.
    pub loading: bool,
}

/// What the review step shows before the order is placed.
#[derive(Debug, Clone)]
pub struct ReviewSummary {
    pub address: Option<Address>,
    pub payment: Option<PaymentMethod>,
    /// Masked card number when card details were entered.
    pub card: Option<String>,
    pub lines: Vec<CartLine>,
    pub totals: Totals,
}

/// Handed to the confirmation page after a successful order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Identifier from the order API, when it returned one.
    pub order_id: Option<OrderId>,
    /// Totals the shopper saw when placing the order.
    pub totals: Totals,
}
