//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! `TaxAccumulator` that keeps tax exact until the single rounding step.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    $3.89 is 389 cents, $3.32 is 332 cents, always exact             │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Tax Accumulator?
//! Summing per-line taxes that were each rounded to a cent drifts by a
//! penny against the true total (389 × 15% = 58.35¢; rounding every line
//! loses the .35). The accumulator keeps every line's tax in exact
//! hundredths-of-a-cent units and rounds ONCE when the total is read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: change-due math subtracts before clamping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use storepro_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use storepro_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(332); // $3.32
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 664);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns the larger of two values. Used for change-due clamping:
    /// `change = max(0, tendered - due)`.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }
}

/// Display formats as currency with a literal `$` prefix and exactly two
/// decimal places, the way receipts and EOD reports print amounts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Tax Accumulator
// =============================================================================

/// Accumulates tax across cart lines without intermediate rounding.
///
/// Each line contributes `line_total_cents × rate_bps`, kept as an exact
/// integer numerator over 10,000. Reading [`TaxAccumulator::total`] divides
/// and rounds half-up exactly once.
///
/// ## Example
/// ```rust
/// use storepro_core::money::{Money, TaxAccumulator};
/// use storepro_core::types::TaxRate;
///
/// // $3.89 × 1 and $3.32 × 2, both at 15%
/// let mut acc = TaxAccumulator::new();
/// acc.add(Money::from_cents(389), TaxRate::from_bps(1500));
/// acc.add(Money::from_cents(664), TaxRate::from_bps(1500));
///
/// // Exact tax is $1.5795; rounded once it is $1.58, not $1.57 or $1.59
/// assert_eq!(acc.total().cents(), 158);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxAccumulator {
    /// Sum of `line_total_cents × rate_bps`. i128 so a full cart of maxed
    /// quantities cannot overflow.
    numerator: i128,
}

impl TaxAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        TaxAccumulator { numerator: 0 }
    }

    /// Adds one line's tax, unrounded: `line_total × rate`.
    pub fn add(&mut self, line_total: Money, rate: TaxRate) {
        self.numerator += line_total.cents() as i128 * rate.bps() as i128;
    }

    /// The accumulated tax, rounded half-up to a whole cent.
    ///
    /// The +5000 provides rounding (5000/10000 = 0.5).
    pub fn total(&self) -> Money {
        Money::from_cents(((self.numerator + 5000) / 10000) as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
