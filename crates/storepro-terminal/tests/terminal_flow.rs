//! End-to-end session tests against a real in-memory SQLite database.
//!
//! Covers the full ring-pay-commit-print-EOD path plus the failure rules:
//! commit retry without re-ringing, printer failures never un-committing,
//! and snapshots surviving later catalog edits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use storepro_core::types::{NewSale, PaymentMethod, Product, Sale};
use storepro_core::{CoreError, Money, WorkflowPhase};
use storepro_db::{Database, DbConfig, SaleRepository};
use storepro_terminal::{
    BoxError, NullPrinter, ReceiptPrinter, SaleJournal, Terminal, TerminalError,
};

// =============================================================================
// Fixtures
// =============================================================================

async fn seeded_db() -> Database {
    // RUST_LOG=debug cargo test -- --nocapture to watch the session
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    for (sku, name, cents, bps) in [
        ("FC-001", "Fish Cake", 389i64, 1500u32),
        ("P-002", "Poutine", 332, 1500),
        ("BI-003", "Big Item", 2500, 0),
    ] {
        db.products()
            .insert(&Product {
                sku: sku.to_string(),
                name: name.to_string(),
                unit_cost_cents: cents,
                tax_rate_bps: bps,
                qty_on_hand: 50,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
    }
    db
}

/// Journal wrapper that fails exactly once when armed, then recovers.
struct FlakyJournal {
    inner: SaleRepository,
    fail_next: Arc<AtomicBool>,
}

#[async_trait]
impl SaleJournal for FlakyJournal {
    async fn save_sale_atomic(&self, sale: &NewSale) -> Result<Sale, BoxError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err("journal offline".into());
        }
        Ok(self.inner.save_sale_atomic(sale).await?)
    }

    async fn sales_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, BoxError> {
        Ok(self.inner.query_sales_in_range(start, end).await?)
    }
}

/// Printer that always fails.
struct DeadPrinter;

#[async_trait]
impl ReceiptPrinter for DeadPrinter {
    async fn print(&mut self, _document: &str) -> Result<(), BoxError> {
        Err("out of paper".into())
    }

    async fn cut(&mut self) -> Result<(), BoxError> {
        Err("out of paper".into())
    }

    async fn flush(&mut self) -> Result<(), BoxError> {
        Err("out of paper".into())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn full_sale_flow_from_ring_to_receipt() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);

    // Ring: 1 × Fish Cake + 2 × Poutine at 15% tax
    terminal.add_item("FC-001").await.unwrap();
    terminal.set_multiplier(2).unwrap();
    terminal.add_item("P-002").await.unwrap();

    assert_eq!(terminal.cart().subtotal().cents(), 1053);
    assert_eq!(terminal.cart().tax().cents(), 158);
    assert_eq!(terminal.cart().total().cents(), 1211);

    // Capture: short tender rejected, capture stays open
    let due = terminal.begin_payment().unwrap();
    assert_eq!(due.cents(), 1211);

    let err = terminal
        .submit_tender(Money::from_cents(1000), PaymentMethod::Cash)
        .unwrap_err();
    assert!(matches!(
        err,
        TerminalError::Core(CoreError::InsufficientPayment { .. })
    ));
    assert_eq!(terminal.phase(), WorkflowPhase::Capturing);

    let change = terminal
        .submit_tender(Money::from_cents(2000), PaymentMethod::Cash)
        .unwrap();
    assert_eq!(change.cents(), 789);

    // Commit clears the session
    let sale = terminal.commit().await.unwrap();
    assert_eq!(sale.id, 1);
    assert_eq!(sale.order_number(), "000000001");
    assert_eq!(sale.total().cents(), 1211);
    assert!(terminal.cart().is_empty());
    assert_eq!(terminal.phase(), WorkflowPhase::Idle);

    // Receipt carries the committed totals
    let document = terminal.render_receipt(&sale);
    assert!(document.contains("TASTE EAST"));
    assert!(document.contains("000000001"));
    let total_line = document.lines().find(|l| l.starts_with("Total:")).unwrap();
    assert!(total_line.ends_with("$12.11"));

    terminal.print_receipt(&sale).await.unwrap();
}

#[tokio::test]
async fn unknown_sku_leaves_cart_unchanged() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);

    terminal.add_item("FC-001").await.unwrap();
    let err = terminal.add_item("NOPE").await.unwrap_err();
    assert!(matches!(err, TerminalError::ProductNotFound(sku) if sku == "NOPE"));
    assert_eq!(terminal.cart().item_count(), 1);
}

#[tokio::test]
async fn cart_locks_while_payment_is_open() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);

    terminal.add_item("FC-001").await.unwrap();
    terminal.begin_payment().unwrap();

    let err = terminal.add_item("P-002").await.unwrap_err();
    assert!(matches!(
        err,
        TerminalError::Core(CoreError::WrongPhase { .. })
    ));
    assert!(terminal.remove_item(0).is_err());

    // Cancel unlocks; the cart survives intact
    terminal.cancel_payment().unwrap();
    assert_eq!(terminal.cart().item_count(), 1);
    terminal.add_item("P-002").await.unwrap();
    assert_eq!(terminal.cart().item_count(), 2);
}

#[tokio::test]
async fn failed_commit_preserves_cart_and_settlement_for_retry() {
    let db = seeded_db().await;
    let fail_next = Arc::new(AtomicBool::new(true));
    let journal = FlakyJournal {
        inner: db.sales(),
        fail_next: fail_next.clone(),
    };
    let mut terminal = Terminal::new(db.products(), journal, NullPrinter);

    terminal.add_item("FC-001").await.unwrap();
    let due = terminal.begin_payment().unwrap();
    terminal.submit_tender(due, PaymentMethod::Debit).unwrap();

    // First commit hits the armed failure
    let err = terminal.commit().await.unwrap_err();
    assert!(matches!(err, TerminalError::CommitFailed(_)));
    assert_eq!(terminal.cart().item_count(), 1);

    // Retry succeeds without re-ringing or re-tendering
    let sale = terminal.commit().await.unwrap();
    assert_eq!(sale.payment_method, PaymentMethod::Debit);
    assert!(terminal.cart().is_empty());

    // Exactly one sale was journaled
    assert!(db.sales().get_by_id(sale.id).await.unwrap().is_some());
    assert!(db.sales().get_by_id(sale.id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn commit_without_settlement_is_rejected() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);

    terminal.add_item("FC-001").await.unwrap();
    let err = terminal.commit().await.unwrap_err();
    assert!(matches!(err, TerminalError::NothingToCommit));

    // A settlement is consumed by its commit; a second commit has nothing
    let due = terminal.begin_payment().unwrap();
    terminal.submit_tender(due, PaymentMethod::Cash).unwrap();
    terminal.commit().await.unwrap();
    let err = terminal.commit().await.unwrap_err();
    assert!(matches!(err, TerminalError::NothingToCommit));
}

#[tokio::test]
async fn printer_failure_never_uncommits_the_sale() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), DeadPrinter);

    terminal.add_item("FC-001").await.unwrap();
    let due = terminal.begin_payment().unwrap();
    terminal.submit_tender(due, PaymentMethod::Cash).unwrap();
    let sale = terminal.commit().await.unwrap();

    let err = terminal.print_receipt(&sale).await.unwrap_err();
    assert!(matches!(err, TerminalError::PrinterUnavailable(_)));

    // Still journaled
    assert!(db.sales().get_by_id(sale.id).await.unwrap().is_some());
}

#[tokio::test]
async fn committed_sales_are_immune_to_later_price_changes() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);

    terminal.add_item("FC-001").await.unwrap();
    let due = terminal.begin_payment().unwrap();
    terminal.submit_tender(due, PaymentMethod::Cash).unwrap();
    let sale = terminal.commit().await.unwrap();
    let original = terminal.render_receipt(&sale);

    db.products().update_price("FC-001", 999).await.unwrap();

    // Reload and re-render: byte-identical receipt
    let reloaded = db.sales().get_by_id(sale.id).await.unwrap().unwrap();
    assert_eq!(reloaded.items[0].unit_cost_cents, 389);
    assert_eq!(terminal.render_receipt(&reloaded), original);
}

#[tokio::test]
async fn void_sale_resets_the_session() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);

    terminal.add_item("FC-001").await.unwrap();
    let due = terminal.begin_payment().unwrap();
    terminal.submit_tender(due, PaymentMethod::Cash).unwrap();

    terminal.void_sale();
    assert!(terminal.cart().is_empty());
    assert_eq!(terminal.phase(), WorkflowPhase::Idle);

    // A fresh sale starts cleanly
    terminal.add_item("P-002").await.unwrap();
    assert_eq!(terminal.begin_payment().unwrap().cents(), 382);
}

#[tokio::test]
async fn eod_report_rolls_up_the_day() {
    let db = seeded_db().await;
    let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);
    let today = Utc::now().date_naive();

    // Sale 1: $12.11 cash
    terminal.add_item("FC-001").await.unwrap();
    terminal.set_multiplier(2).unwrap();
    terminal.add_item("P-002").await.unwrap();
    let due = terminal.begin_payment().unwrap();
    terminal
        .submit_tender(Money::from_cents(2000), PaymentMethod::Cash)
        .unwrap();
    assert_eq!(due.cents(), 1211);
    terminal.commit().await.unwrap();

    // Sale 2: $25.00 credit, exact
    terminal.add_item("BI-003").await.unwrap();
    let due = terminal.begin_payment().unwrap();
    terminal.submit_tender(due, PaymentMethod::Credit).unwrap();
    terminal.commit().await.unwrap();

    let (summary, report) = terminal.eod_report(today).await.unwrap();
    assert_eq!(summary.total_sales_cents, 3711);
    assert_eq!(summary.totals_by_method[&PaymentMethod::Cash], 1211);
    assert_eq!(summary.totals_by_method[&PaymentMethod::Credit], 2500);
    assert_eq!(summary.product_totals["P-002"].quantity, 2);

    let total_line = report
        .lines()
        .find(|l| l.starts_with("Total Sales:"))
        .unwrap();
    assert!(total_line.ends_with("$37.11"));

    // Empty day is a valid zero report
    let yesterday = today.pred_opt().unwrap();
    let (empty, empty_report) = terminal.eod_report(yesterday).await.unwrap();
    assert_eq!(empty.total_sales_cents, 0);
    assert!(empty_report.contains("Total Sales:"));
}
