//! Client-side shopping cart.
//!
//! The cart is local state: it never talks to the network. Totals are
//! recomputed synchronously inside every mutating operation, so `subtotal`,
//! `tax` and `total` are always consistent with `items`. The backend
//! re-prices the cart at checkout; these figures exist for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;

/// VAT applied on top of the product subtotal: a flat 10%.
pub const VAT_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// One cart line: a product snapshot and a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    /// Line subtotal (`quantity x current_price`), maintained by [`Cart`].
    pub subtotal: Decimal,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    /// Sum of line subtotals, before VAT.
    pub subtotal: Decimal,
    /// 10% of `subtotal`.
    pub tax: Decimal,
    /// `subtotal + tax`.
    pub total: Decimal,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing line when the product is already in the
    /// cart - one line per distinct product id.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            // Refresh the snapshot so a re-added product carries its latest price
            item.product = product;
        } else {
            self.items.push(CartItem {
                product,
                quantity,
                subtotal: Decimal::ZERO,
            });
        }
        self.recompute();
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Unknown product ids are ignored.
    pub fn update(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
        self.recompute();
    }

    /// Remove a line. Removing an id that is not in the cart is a no-op.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product.id != product_id);
        self.recompute();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    /// True when the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    fn recompute(&mut self) {
        for item in &mut self.items {
            item.subtotal = item.product.current_price * Decimal::from(item.quantity);
        }
        self.subtotal = self.items.iter().map(|i| i.subtotal).sum();
        self.tax = self.subtotal * VAT_RATE;
        self.total = self.subtotal + self.tax;
    }
}
