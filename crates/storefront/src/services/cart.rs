//! Cart lines as checkout sees them.

use std::sync::{PoisonError, RwLock};

use facet_core::{ProductId, RawPrice};
use serde::{Deserialize, Serialize};

/// A line in the shopper's cart.
///
/// Read-only to checkout. The cart store names fields inconsistently across
/// screens, so the common aliases are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(alias = "product_id", alias = "id")]
    pub product_ref: ProductId,
    #[serde(default, alias = "name")]
    pub display_name: String,
    /// Numeric or currency-formatted unit price.
    #[serde(alias = "price")]
    pub unit_price: RawPrice,
    pub quantity: u32,
    #[serde(default, alias = "image")]
    pub image_ref: Option<String>,
}

/// Source of the current cart.
pub trait CartSource: Send + Sync {
    /// Current cart lines.
    fn lines(&self) -> Vec<CartLine>;

    /// Empty the cart after a completed purchase.
    fn clear(&self);

    /// Whether the cart has no lines.
    fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

/// In-process cart store.
#[derive(Debug, Default)]
pub struct MemoryCart {
    lines: RwLock<Vec<CartLine>>,
}

impl MemoryCart {
    /// Create a cart holding `lines`.
    ///
    /// Lines with a zero quantity are dropped.
    #[must_use]
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self {
            lines: RwLock::new(lines.into_iter().filter(|l| l.quantity > 0).collect()),
        }
    }

    /// Add a line, merging quantities with an existing line for the same product.
    pub fn add(&self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        match lines.iter_mut().find(|l| l.product_ref == line.product_ref) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
}

impl CartSource for MemoryCart {
    fn lines(&self) -> Vec<CartLine> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn clear(&self) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
