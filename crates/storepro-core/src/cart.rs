//! # Cart
//!
//! The in-memory, pre-commit collection of line items for the sale
//! currently being built.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                               │
//! │                                                                     │
//! │  Scan / tap product ──► add_product() ──► merge by SKU or push      │
//! │                                                                     │
//! │  Press digit 1-9 ──────► set_multiplier() ──► next add uses qty n   │
//! │                                                                     │
//! │  Tap remove ───────────► remove_item(index) ──► silent no-op if OOR │
//! │                                                                     │
//! │  Void / after commit ──► clear() ──► empty cart, multiplier reset   │
//! │                                                                     │
//! │  subtotal()/tax()/total() are DERIVED on every read, never cached.  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line item per distinct SKU (adding merges quantities)
//! - `subtotal = Σ(qty × unit_cost)`, `tax = Σ(qty × unit_cost × rate)`
//!   accumulated unrounded and rounded once, `total = subtotal + tax`
//! - Quantity is always positive; the multiplier is 1-9 or absent

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxAccumulator};
use crate::types::{NewSaleItem, Product, TaxRate};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Line Item
// =============================================================================

/// One product line in the cart.
///
/// ## Price Freezing
/// Product details are copied when the item is added. If the product is
/// edited in the database afterwards, the cart keeps displaying (and will
/// commit) the price the cashier saw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// SKU at time of adding (frozen).
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit cost in cents at time of adding (frozen).
    pub unit_cost_cents: i64,

    /// Tax rate in basis points at time of adding (frozen).
    pub tax_rate_bps: u32,

    /// Quantity in the cart (always positive).
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line item from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            sku: product.sku.clone(),
            name: product.name.clone(),
            unit_cost_cents: product.unit_cost_cents,
            tax_rate_bps: product.tax_rate_bps,
            quantity,
        }
    }

    /// Unit cost as Money.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// Line total before tax (unit cost × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_cost().multiply_quantity(self.quantity)
    }

    /// Tax rate for this line.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The sale in progress: an ordered sequence of line items plus a pending
/// quantity multiplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
    /// Pre-set quantity for the NEXT added item; cleared after use.
    multiplier: Option<i64>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            multiplier: None,
        }
    }

    /// The line items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The pending multiplier, if one is armed.
    pub fn multiplier(&self) -> Option<i64> {
        self.multiplier
    }

    /// Adds a product to the cart, consuming the pending multiplier.
    ///
    /// ## Behavior
    /// - If a line for the product's SKU exists: increments its quantity
    ///   by `multiplier ?? 1` (never a duplicate row per SKU)
    /// - Otherwise: pushes a new line with that quantity
    /// - The multiplier is cleared whether or not the add succeeds, so a
    ///   stale "×7" can never leak onto a later item
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        let quantity = self.multiplier.take().unwrap_or(1);

        if let Some(item) = self.items.iter_mut().find(|i| i.sku == product.sku) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(LineItem::from_product(product, quantity));
        Ok(())
    }

    /// Toggles the pending multiplier.
    ///
    /// ## Behavior
    /// - Pressing a digit arms it; pressing the SAME digit again clears it
    /// - Valid range is 1-9; anything else is a no-op, not an error (the
    ///   keypad can only produce 1-9, so out-of-range means a caller bug
    ///   we refuse to escalate into a crashed sale)
    pub fn set_multiplier(&mut self, n: i64) {
        if !(1..=9).contains(&n) {
            return;
        }
        if self.multiplier == Some(n) {
            self.multiplier = None;
        } else {
            self.multiplier = Some(n);
        }
    }

    /// Removes the line item at the given position.
    ///
    /// Out-of-range indexes are a silent no-op: removal errors must never
    /// crash the cart mid-sale.
    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Empties the cart and resets the multiplier.
    /// Used after a successful commit or an explicit void.
    pub fn clear(&mut self) {
        self.items.clear();
        self.multiplier = None;
    }

    /// Checks if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal before tax: `Σ(qty × unit_cost)`. Derived on every call.
    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.line_total())
    }

    /// Tax: `Σ(qty × unit_cost × rate)`, accumulated unrounded and rounded
    /// half-up exactly once here. Summing per-line rounded taxes would
    /// drift by a penny against the true total.
    pub fn tax(&self) -> Money {
        let mut acc = TaxAccumulator::new();
        for item in &self.items {
            acc.add(item.line_total(), item.tax_rate());
        }
        acc.total()
    }

    /// Grand total: subtotal + tax.
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }

    /// Frozen item snapshots for the commit service, in insertion order.
    pub fn item_snapshots(&self) -> Vec<NewSaleItem> {
        self.items
            .iter()
            .map(|i| NewSaleItem {
                sku: i.sku.clone(),
                name: i.name.clone(),
                unit_cost_cents: i.unit_cost_cents,
                tax_rate_bps: i.tax_rate_bps,
                quantity: i.quantity,
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(sku: &str, unit_cost_cents: i64, tax_rate_bps: u32) -> Product {
        Product {
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            unit_cost_cents,
            tax_rate_bps,
            qty_on_hand: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_product() {
        let mut cart = Cart::new();
        cart.add_product(&product("A", 999, 1500)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 1);
        assert_eq!(cart.subtotal().cents(), 999);
    }

    #[test]
    fn test_add_same_sku_merges_lines() {
        let mut cart = Cart::new();
        let p = product("A", 999, 1500);

        cart.set_multiplier(2);
        cart.add_product(&p).unwrap();
        cart.set_multiplier(3);
        cart.add_product(&p).unwrap();

        // One line with quantity 5, never two lines
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_multiplier_toggles_and_clears_after_use() {
        let mut cart = Cart::new();
        let p = product("A", 100, 0);

        cart.set_multiplier(4);
        assert_eq!(cart.multiplier(), Some(4));
        // Same digit again clears
        cart.set_multiplier(4);
        assert_eq!(cart.multiplier(), None);

        cart.set_multiplier(3);
        cart.add_product(&p).unwrap();
        assert_eq!(cart.items()[0].quantity, 3);
        // Consumed: the next add is a plain ×1
        assert_eq!(cart.multiplier(), None);
        cart.add_product(&p).unwrap();
        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn test_multiplier_out_of_range_is_noop() {
        let mut cart = Cart::new();
        cart.set_multiplier(0);
        cart.set_multiplier(10);
        cart.set_multiplier(-3);
        assert_eq!(cart.multiplier(), None);

        cart.set_multiplier(9);
        cart.set_multiplier(42);
        // Armed value survives the invalid press
        assert_eq!(cart.multiplier(), Some(9));
    }

    #[test]
    fn test_remove_item_out_of_range_is_silent() {
        let mut cart = Cart::new();
        cart.add_product(&product("A", 100, 0)).unwrap();

        cart.remove_item(5); // no panic, no change
        assert_eq!(cart.item_count(), 1);

        cart.remove_item(0);
        assert!(cart.is_empty());

        cart.remove_item(0); // removing from empty is fine too
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_resets_multiplier() {
        let mut cart = Cart::new();
        cart.add_product(&product("A", 100, 0)).unwrap();
        cart.set_multiplier(7);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.multiplier(), None);
    }

    /// Worked scenario: A ($3.89 ×1) and B ($3.32 ×2) at 15%.
    /// subtotal = $10.53, tax = $1.5795 rounded once → $1.58, total $12.11.
    #[test]
    fn test_totals_round_once_at_boundary() {
        let mut cart = Cart::new();
        cart.add_product(&product("A", 389, 1500)).unwrap();
        cart.set_multiplier(2);
        cart.add_product(&product("B", 332, 1500)).unwrap();

        assert_eq!(cart.subtotal().cents(), 1053);
        assert_eq!(cart.tax().cents(), 158);
        assert_eq!(cart.total().cents(), 1211);
        assert_eq!(format!("{}", cart.total()), "$12.11");
    }

    #[test]
    fn test_total_equals_subtotal_plus_tax() {
        let mut cart = Cart::new();
        for (sku, cents, bps, qty) in
            [("A", 333, 1000, 3), ("B", 199, 1500, 2), ("C", 1099, 0, 1)]
        {
            cart.set_multiplier(qty);
            cart.add_product(&product(sku, cents, bps)).unwrap();
        }
        assert_eq!(cart.total(), cart.subtotal() + cart.tax());
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        let p = product("A", 100, 0);
        for _ in 0..111 {
            cart.set_multiplier(9);
            cart.add_product(&p).unwrap();
        }
        // 111 × 9 = 999 is the cap; one more must fail and leave the line alone
        let err = cart.add_product(&p).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: MAX_ITEM_QUANTITY
            }
        );
        assert_eq!(cart.items()[0].quantity, 999);
    }

    #[test]
    fn test_item_snapshots_preserve_order() {
        let mut cart = Cart::new();
        cart.add_product(&product("B", 100, 0)).unwrap();
        cart.add_product(&product("A", 200, 0)).unwrap();

        let snaps = cart.item_snapshots();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].sku, "B");
        assert_eq!(snaps[1].sku, "A");
    }
}
