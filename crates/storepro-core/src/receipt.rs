//! # Receipt Formatter
//!
//! Pure function: committed `Sale` → fixed-width receipt text. No I/O, no
//! clock, no external state; the same sale always renders the same bytes,
//! which is what makes the printer retry path safe.
//!
//! ## Document Layout (default width 40)
//! ```text
//! ┌──────────────────────────────────────┐
//! │              TASTE EAST              │  header block (store identity,
//! │            62 Allandale Rd           │  static configuration)
//! │                                      │
//! │  Date:            25/08/2026 03:42 PM│  properties block
//! │  Order Number:             000000042 │
//! │  ------------------------------------│
//! │  Poutine              2        $3.32 │  table block, one row per item,
//! │  Fish Cake            1        $3.89 │  descending quantity (stable)
//! │  ------------------------------------│
//! │                                      │
//! │       Not all items include tax.     │  disclaimer
//! │                                      │
//! │  Sub Total:                   $10.53 │  totals properties block
//! │  GST/HST:                      $1.58 │
//! │  Total:                       $12.11 │
//! │                                      │
//! │    Thank you for shopping at ...     │  closing block
//! └──────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::layout::{align, center, ruler, wrap_words};
use crate::types::Sale;

// =============================================================================
// Receipt Configuration
// =============================================================================

/// Store identity and layout settings shared by receipts and EOD reports.
///
/// This is static terminal configuration, not sale data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    /// Total column width of the printed document.
    pub width: usize,

    /// Fill character for separator rules.
    pub ruler: char,

    /// Centered store identity lines printed at the top.
    pub header: Vec<String>,

    /// Single centered line printed between the table and the totals.
    pub disclaimer: String,

    /// Closing paragraph, word-wrapped and centered.
    pub thank_you: String,

    /// Horizontal margin applied when wrapping the closing paragraph.
    pub thank_you_padding: usize,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        ReceiptConfig {
            width: 40,
            ruler: '-',
            header: vec![
                "TASTE EAST".to_string(),
                "62 Allandale Rd".to_string(),
                "taste.east@hotmail.com".to_string(),
                "www.tasteeastnl.ca".to_string(),
            ],
            disclaimer: "Not all items include tax.".to_string(),
            thank_you: "Thank you for shopping at Taste East! If you have any \
                        requests or complains, don't forget to contact us. \
                        Have a great day!"
                .to_string(),
            thank_you_padding: 5,
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Width reserved for the quantity column in the item table.
const QTY_COL: usize = 4;
/// Width reserved for the unit cost column in the item table.
const COST_COL: usize = 10;

/// Renders a committed sale as a fixed-width receipt document.
///
/// Sections, in order: store header, properties (`Date`, `Order Number`),
/// item table (descending quantity, stable for ties), disclaimer, totals
/// (`Sub Total`, `GST/HST`, `Total`), thank-you block, two blank lines.
///
/// The date printed is the sale's commit timestamp, never "now": reprints
/// must match the original.
pub fn format(sale: &Sale, config: &ReceiptConfig) -> String {
    let width = config.width;
    let mut doc: Vec<String> = Vec::new();

    // Header block
    for line in &config.header {
        doc.push(center(line, width));
    }
    doc.push(String::new());

    // Properties block
    let date = sale.timestamp.format("%d/%m/%Y %I:%M %p").to_string();
    doc.push(align("Date", &date, width, ' '));
    doc.push(align("Order Number", &sale.order_number(), width, ' '));

    // Table block: descending quantity; ties keep insertion order
    let mut items = sale.items.clone();
    items.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    let name_col = width.saturating_sub(QTY_COL + COST_COL);
    doc.push(ruler(width, config.ruler));
    for item in &items {
        let name: String = item.name.chars().take(name_col).collect();
        doc.push(format!(
            "{:<name_col$}{:>QTY_COL$}{:>COST_COL$}",
            name,
            item.quantity,
            item.unit_cost().to_string(),
        ));
    }
    doc.push(ruler(width, config.ruler));
    doc.push(String::new());

    // Disclaimer
    doc.push(center(&config.disclaimer, width));
    doc.push(String::new());

    // Totals properties block - the ONE place money meets the display
    // boundary, already rounded exactly once at commit
    doc.push(align("Sub Total", &sale.subtotal().to_string(), width, ' '));
    doc.push(align("GST/HST", &sale.tax().to_string(), width, ' '));
    doc.push(align("Total", &sale.total().to_string(), width, ' '));
    doc.push(String::new());

    // Closing block
    let wrap_width = width.saturating_sub(config.thank_you_padding * 2);
    for line in wrap_words(&config.thank_you, wrap_width) {
        doc.push(center(&line, width));
    }
    doc.push(String::new());
    doc.push(String::new());

    doc.join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PaymentMethod, SaleItem};
    use chrono::{TimeZone, Utc};

    fn item(sku: &str, name: &str, cents: i64, qty: i64) -> SaleItem {
        SaleItem {
            id: format!("item-{sku}"),
            sale_id: 42,
            sku: sku.to_string(),
            name: name.to_string(),
            unit_cost_cents: cents,
            tax_rate_bps: 1500,
            quantity: qty,
        }
    }

    fn sample_sale() -> Sale {
        Sale {
            id: 42,
            timestamp: Utc.with_ymd_and_hms(2026, 8, 25, 15, 42, 0).unwrap(),
            subtotal_cents: 1053,
            tax_cents: 158,
            amount_paid_cents: 2000,
            payment_method: PaymentMethod::Cash,
            items: vec![
                item("A", "Fish Cake", 389, 1),
                item("B", "Poutine", 332, 2),
            ],
        }
    }

    #[test]
    fn test_receipt_sections_in_order() {
        let text = format(&sample_sale(), &ReceiptConfig::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "TASTE EAST");
        assert_eq!(lines[4], "");

        let date_pos = lines.iter().position(|l| l.starts_with("Date:")).unwrap();
        let order_pos = lines
            .iter()
            .position(|l| l.starts_with("Order Number:"))
            .unwrap();
        let disclaimer_pos = lines
            .iter()
            .position(|l| l.trim() == "Not all items include tax.")
            .unwrap();
        let total_pos = lines.iter().position(|l| l.starts_with("Total:")).unwrap();

        assert!(date_pos < order_pos);
        assert!(order_pos < disclaimer_pos);
        assert!(disclaimer_pos < total_pos);
    }

    #[test]
    fn test_order_number_padded_to_nine_digits() {
        let text = format(&sample_sale(), &ReceiptConfig::default());
        let line = text
            .lines()
            .find(|l| l.starts_with("Order Number:"))
            .unwrap();
        assert!(line.ends_with("000000042"));
        assert_eq!(line.len(), 40);
    }

    #[test]
    fn test_items_sorted_by_descending_quantity() {
        let text = format(&sample_sale(), &ReceiptConfig::default());
        let poutine = text.lines().position(|l| l.starts_with("Poutine")).unwrap();
        let fish = text
            .lines()
            .position(|l| l.starts_with("Fish Cake"))
            .unwrap();
        // Poutine (qty 2) prints above Fish Cake (qty 1)
        assert!(poutine < fish);
    }

    #[test]
    fn test_quantity_ties_keep_insertion_order() {
        let mut sale = sample_sale();
        sale.items = vec![
            item("A", "Second", 100, 3),
            item("B", "Zebra", 100, 5),
            item("C", "Apple", 100, 3),
        ];
        let text = format(&sale, &ReceiptConfig::default());
        let second = text.lines().position(|l| l.starts_with("Second")).unwrap();
        let zebra = text.lines().position(|l| l.starts_with("Zebra")).unwrap();
        let apple = text.lines().position(|l| l.starts_with("Apple")).unwrap();

        assert!(zebra < second, "highest quantity first");
        assert!(second < apple, "stable sort keeps insertion order on ties");
    }

    /// Round-trip: re-parsing the totals lines reproduces the committed
    /// amounts to the cent.
    #[test]
    fn test_totals_parse_back_to_the_cent() {
        let sale = sample_sale();
        let text = format(&sale, &ReceiptConfig::default());

        fn parse_total(text: &str, label: &str) -> i64 {
            let line = text
                .lines()
                .find(|l| l.starts_with(label))
                .unwrap_or_else(|| panic!("missing {label} line"));
            let amount = line.rsplit('$').next().unwrap();
            let (dollars, cents) = amount.split_once('.').unwrap();
            dollars.parse::<i64>().unwrap() * 100 + cents.parse::<i64>().unwrap()
        }

        assert_eq!(parse_total(&text, "Sub Total:"), sale.subtotal_cents);
        assert_eq!(parse_total(&text, "GST/HST:"), sale.tax_cents);
        assert_eq!(
            parse_total(&text, "Total:"),
            sale.subtotal_cents + sale.tax_cents
        );
    }

    #[test]
    fn test_date_is_sale_timestamp_not_now() {
        let text = format(&sample_sale(), &ReceiptConfig::default());
        let line = text.lines().find(|l| l.starts_with("Date:")).unwrap();
        assert!(line.contains("25/08/2026 03:42 PM"));
    }

    #[test]
    fn test_custom_width_is_respected() {
        let config = ReceiptConfig {
            width: 32,
            ..ReceiptConfig::default()
        };
        let text = format(&sample_sale(), &config);
        let total_line = text.lines().find(|l| l.starts_with("Total:")).unwrap();
        assert_eq!(total_line.len(), 32);
    }

    #[test]
    fn test_long_product_name_is_truncated_to_name_column() {
        let mut sale = sample_sale();
        sale.items = vec![item(
            "L",
            "This length is ridiculously lengthy indeed",
            8516,
            14,
        )];
        let text = format(&sale, &ReceiptConfig::default());
        let row = text.lines().find(|l| l.starts_with("This length")).unwrap();
        assert_eq!(row.chars().count(), 40);
        assert!(row.ends_with("$85.16"));
    }
}
