//! # Domain Types
//!
//! Core domain types for the sale transaction engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌────────────────┐   ┌──────────────────┐     │
//! │  │   Product     │   │   Settlement   │   │      Sale        │     │
//! │  │  ───────────  │   │  ────────────  │   │  ──────────────  │     │
//! │  │  sku (unique) │   │  tendered      │   │  id (rowid)      │     │
//! │  │  name         │   │  method        │   │  timestamp (UTC) │     │
//! │  │  unit cost    │   │  change due    │   │  totals, items   │     │
//! │  │  tax rate     │   └────────────────┘   └──────────────────┘     │
//! │  └───────────────┘                                                  │
//! │                                                                     │
//! │  ┌───────────────┐   ┌────────────────┐                            │
//! │  │   TaxRate     │   │ PaymentMethod  │                            │
//! │  │  ───────────  │   │  ────────────  │                            │
//! │  │  bps (u32)    │   │  Cash          │                            │
//! │  │  1500 = 15%   │   │  Debit         │                            │
//! │  └───────────────┘   │  Credit        │                            │
//! │                      └────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `SaleItem` carries a frozen copy of the product's sku/name/cost/rate
//! at the moment of sale. Historical receipts and EOD reports must not
//! change retroactively when a product record is edited later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;
use crate::ORDER_NUMBER_WIDTH;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000.
/// 1500 bps = 15% (GST/HST), with no float in sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if the tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Owned by the inventory collaborator; the engine only reads it by SKU
/// (or name prefix) and snapshots it into carts and sale items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit cost in cents (smallest currency unit).
    pub unit_cost_cents: i64,

    /// Tax rate in basis points (1500 = 15%).
    pub tax_rate_bps: u32,

    /// Current stock level. Stored for the inventory collaborator;
    /// the engine never decrements it.
    pub qty_on_hand: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit cost as a Money type.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a customer settled the amount due.
///
/// External card/debit authorization is out of scope; a method here just
/// records what the cashier accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Debit card on an external terminal.
    Debit,
    /// Credit card on an external terminal.
    Credit,
}

impl PaymentMethod {
    /// Storage representation (matches the `sales.payment_method` column).
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Credit => "credit",
        }
    }

    /// Human label used on EOD report lines.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Debit => "Debit",
            PaymentMethod::Credit => "Credit",
        }
    }

    /// All methods, in the order EOD reports list them.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Credit,
        PaymentMethod::Debit,
        PaymentMethod::Cash,
    ];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "debit" => Ok(PaymentMethod::Debit),
            "credit" => Ok(PaymentMethod::Credit),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// The accepted payment outcome for a cart about to be committed.
///
/// Produced exactly once per [`crate::payment::PaymentWorkflow`]; the
/// tendered amount is always >= the amount due, so `change_cents` is the
/// only derived field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Amount of money the customer handed over, in cents.
    pub tendered_cents: i64,

    /// How the customer paid.
    pub method: PaymentMethod,

    /// Change returned to the customer: `max(0, tendered - due)`.
    pub change_cents: i64,
}

impl Settlement {
    /// Returns the tendered amount as Money.
    #[inline]
    pub fn tendered(&self) -> Money {
        Money::from_cents(self.tendered_cents)
    }

    /// Returns the change due as Money.
    #[inline]
    pub fn change_due(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The immutable, persisted record of a completed transaction.
///
/// Created exactly once by the sale commit service; owns its items
/// (deleting a sale deletes its items).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Auto-generated identifier (SQLite rowid).
    pub id: i64,

    /// Commit time in UTC, assigned by the commit service.
    pub timestamp: DateTime<Utc>,

    /// Sum of line totals, before tax, in cents.
    pub subtotal_cents: i64,

    /// Tax, rounded once at commit, in cents.
    pub tax_cents: i64,

    /// Amount applied to the sale, in cents. Equals subtotal + tax; the
    /// raw tender and change are transient and not persisted.
    pub amount_paid_cents: i64,

    /// How the customer paid.
    pub payment_method: PaymentMethod,

    /// Line items in cart insertion order.
    pub items: Vec<SaleItem>,
}

impl Sale {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the tax as Money.
    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    /// Returns the grand total (subtotal + tax) as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.subtotal_cents + self.tax_cents)
    }

    /// Returns the amount paid as Money.
    #[inline]
    pub fn amount_paid(&self) -> Money {
        Money::from_cents(self.amount_paid_cents)
    }

    /// The receipt order number: the id left-padded with zeros to 9 digits.
    ///
    /// ```rust
    /// # use storepro_core::types::{Sale, PaymentMethod};
    /// # use chrono::Utc;
    /// let sale = Sale {
    ///     id: 42,
    ///     timestamp: Utc::now(),
    ///     subtotal_cents: 0,
    ///     tax_cents: 0,
    ///     amount_paid_cents: 0,
    ///     payment_method: PaymentMethod::Cash,
    ///     items: vec![],
    /// };
    /// assert_eq!(sale.order_number(), "000000042");
    /// ```
    pub fn order_number(&self) -> String {
        format!("{:0width$}", self.id, width = ORDER_NUMBER_WIDTH)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// An immutable snapshot of one product line within a committed Sale.
///
/// Not a live pointer to the product: sku, name, unit cost and tax rate
/// are frozen at sale time so history stays correct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    /// Row identifier (UUID v4).
    pub id: String,

    /// Owning sale.
    pub sale_id: i64,

    /// SKU at time of sale (frozen).
    pub sku: String,

    /// Product name at time of sale (frozen).
    pub name: String,

    /// Unit cost in cents at time of sale (frozen).
    pub unit_cost_cents: i64,

    /// Tax rate in basis points at time of sale (frozen).
    pub tax_rate_bps: u32,

    /// Quantity sold (always positive).
    pub quantity: i64,
}

impl SaleItem {
    /// Returns the unit cost as Money.
    #[inline]
    pub fn unit_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents)
    }

    /// Line total before tax (unit cost × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_cost().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// New Sale (pre-commit snapshot)
// =============================================================================

/// A sale as handed to the persistence collaborator, before an id exists.
///
/// Built by the commit service from the cart and the settlement; persisted
/// atomically together with its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    /// Commit time in UTC, assigned by the commit service (not the caller).
    pub timestamp: DateTime<Utc>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub amount_paid_cents: i64,
    pub payment_method: PaymentMethod,
    /// Item snapshots in cart insertion order.
    pub items: Vec<NewSaleItem>,
}

/// One line of a [`NewSale`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub sku: String,
    pub name: String,
    pub unit_cost_cents: i64,
    pub tax_rate_bps: u32,
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
