//! # End-of-Day Aggregation
//!
//! Folds one business day of committed sales into an [`EodSummary`] and
//! renders it as a fixed-width report sharing the receipt's layout helpers.
//!
//! ## Day Window
//! A sale belongs to the report for `date` when its UTC commit timestamp
//! falls inside the half-open window `[date 00:00, date+1 00:00)`. Half-open
//! means a sale committed exactly at the next midnight lands on the next
//! day's report, never on both.
//!
//! ## Local Hours
//! The hourly traffic table buckets by the *store's* wall clock, not UTC:
//! the caller supplies the store's UTC offset and each timestamp is shifted
//! before its hour is read.

use std::collections::BTreeMap;

use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::layout::{align, center, ruler};
use crate::receipt::ReceiptConfig;
use crate::types::{PaymentMethod, Sale};

// =============================================================================
// Summary Types
// =============================================================================

/// Aggregated figures for one business day.
///
/// All maps are `BTreeMap` so iteration (and therefore the rendered report)
/// is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EodSummary {
    /// The business day this summary covers.
    pub date: NaiveDate,

    /// Amount paid per payment method, in cents. Methods with no sales
    /// are absent; rendering treats absence as zero.
    pub totals_by_method: BTreeMap<PaymentMethod, i64>,

    /// Grand total revenue across all methods, in cents.
    pub total_sales_cents: i64,

    /// Number of sales per local hour (0-23). Hours with no sales are
    /// absent.
    pub counts_by_hour: BTreeMap<u32, u32>,

    /// Per-product rollup keyed by SKU snapshot.
    pub product_totals: BTreeMap<String, ProductTotal>,
}

/// Rolled-up figures for one product across the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotal {
    /// Name snapshot (from the first sale item seen for this SKU).
    pub name: String,

    /// Total units sold.
    pub quantity: i64,

    /// Pre-tax revenue (unit cost × quantity, summed), in cents.
    pub revenue_cents: i64,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Summarizes the sales that fall on `date`.
///
/// `sales` may span any range; anything outside the day window is ignored,
/// so callers can hand over a coarse query result. `offset` is the store's
/// UTC offset, used only for the hourly buckets.
///
/// An empty day produces a valid all-zero summary, not an error.
pub fn summarize(sales: &[Sale], date: NaiveDate, offset: FixedOffset) -> EodSummary {
    let window_start = date.and_time(NaiveTime::MIN).and_utc();
    let window_end = (date + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();

    let mut totals_by_method: BTreeMap<PaymentMethod, i64> = BTreeMap::new();
    let mut counts_by_hour: BTreeMap<u32, u32> = BTreeMap::new();
    let mut product_totals: BTreeMap<String, ProductTotal> = BTreeMap::new();
    let mut total_sales_cents = 0i64;

    for sale in sales {
        if sale.timestamp < window_start || sale.timestamp >= window_end {
            continue;
        }

        let revenue = sale.amount_paid().cents();
        *totals_by_method.entry(sale.payment_method).or_insert(0) += revenue;
        total_sales_cents += revenue;

        let local_hour = sale.timestamp.with_timezone(&offset).hour();
        *counts_by_hour.entry(local_hour).or_insert(0) += 1;

        for item in &sale.items {
            let entry = product_totals
                .entry(item.sku.clone())
                .or_insert_with(|| ProductTotal {
                    name: item.name.clone(),
                    quantity: 0,
                    revenue_cents: 0,
                });
            entry.quantity += item.quantity;
            entry.revenue_cents += item.line_total().cents();
        }
    }

    EodSummary {
        date,
        totals_by_method,
        total_sales_cents,
        counts_by_hour,
        product_totals,
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// 12-hour clock label for an hour-of-day: `0` → `12 am`, `15` → `3 pm`.
fn hour_label(hour: u32) -> String {
    let (display, suffix) = match hour {
        0 => (12, "am"),
        1..=11 => (hour, "am"),
        12 => (12, "pm"),
        _ => (hour - 12, "pm"),
    };
    format!("{display} {suffix}")
}

/// Width reserved for the quantity column in the product table.
const QTY_COL: usize = 4;
/// Width reserved for the revenue column in the product table.
const REVENUE_COL: usize = 10;

/// Renders an EOD summary as a fixed-width report using the same store
/// header and alignment rules as the receipt.
///
/// Sections, in order: store header, report date, per-method totals
/// (Credit, Debit, Cash, absent methods printed as `$0.00`), grand total,
/// per-product table, hourly traffic table.
pub fn render(summary: &EodSummary, config: &ReceiptConfig) -> String {
    let width = config.width;
    let mut doc: Vec<String> = Vec::new();

    // Header block
    for line in &config.header {
        doc.push(center(line, width));
    }
    doc.push(String::new());

    doc.push(center("Daily Sales Report", width));
    doc.push(align("Date", &summary.date.format("%d/%m/%Y").to_string(), width, ' '));
    doc.push(String::new());

    // Per-method totals: fixed order, zero-filled so the report shape
    // never changes with traffic
    for method in PaymentMethod::ALL {
        let cents = summary.totals_by_method.get(&method).copied().unwrap_or(0);
        doc.push(align(
            method.label(),
            &crate::money::Money::from_cents(cents).to_string(),
            width,
            ' ',
        ));
    }
    doc.push(ruler(width, config.ruler));
    doc.push(align(
        "Total Sales",
        &crate::money::Money::from_cents(summary.total_sales_cents).to_string(),
        width,
        ' ',
    ));
    doc.push(String::new());

    // Product table
    doc.push(center("Product Information", width));
    doc.push(ruler(width, config.ruler));
    let name_col = width.saturating_sub(QTY_COL + REVENUE_COL);
    for total in summary.product_totals.values() {
        let name: String = total.name.chars().take(name_col).collect();
        doc.push(format!(
            "{:<name_col$}{:>QTY_COL$}{:>REVENUE_COL$}",
            name,
            total.quantity,
            crate::money::Money::from_cents(total.revenue_cents).to_string(),
        ));
    }
    doc.push(ruler(width, config.ruler));
    doc.push(String::new());

    // Hourly traffic
    doc.push(center("Time Table", width));
    doc.push(ruler(width, config.ruler));
    for (&hour, &count) in &summary.counts_by_hour {
        doc.push(align(&hour_label(hour), &count.to_string(), width, ' '));
    }
    doc.push(ruler(width, config.ruler));
    doc.push(String::new());

    doc.join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================
