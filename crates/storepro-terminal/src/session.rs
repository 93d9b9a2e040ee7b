//! # Terminal Session
//!
//! One cashier session: cart edits, payment capture, atomic commit,
//! receipt printing, end-of-day reporting.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Happy Path                                       │
//! │                                                                         │
//! │  add_item("FC-001")          cart grows, totals recompute              │
//! │  add_item("P-002") × n       (set_multiplier for quantities)           │
//! │       │                                                                 │
//! │  begin_payment()             amount due SNAPSHOT, cart locks           │
//! │       │                                                                 │
//! │  submit_tender($20, Cash)    settlement produced, change computed      │
//! │       │                                                                 │
//! │  commit()                    one atomic journal write, cart clears     │
//! │       │                                                                 │
//! │  print_receipt(&sale)        failure here never un-commits             │
//! │       │                                                                 │
//! │  eod_report(date)            at close of business                      │
//! │                                                                         │
//! │  Failure rules:                                                         │
//! │  • commit failure preserves cart AND settlement - retry, don't re-ring │
//! │  • a settled payment is consumed by AT MOST one successful commit      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use tracing::{info, warn};

use crate::collab::{ProductCatalog, ReceiptPrinter, SaleJournal};
use crate::error::{TerminalError, TerminalResult};
use storepro_core::cart::Cart;
use storepro_core::eod::{self, EodSummary};
use storepro_core::money::Money;
use storepro_core::payment::{PaymentWorkflow, WorkflowPhase};
use storepro_core::receipt::{self, ReceiptConfig};
use storepro_core::types::{NewSale, PaymentMethod, Product, Sale, Settlement};
use storepro_core::CoreError;

/// The session engine for one terminal.
///
/// Generic over its collaborators so tests can substitute fakes; production
/// uses the SQLite repositories and a hardware printer.
pub struct Terminal<C, J, P> {
    catalog: C,
    journal: J,
    printer: P,
    cart: Cart,
    workflow: Option<PaymentWorkflow>,
    settlement: Option<Settlement>,
    receipt_config: ReceiptConfig,
    store_offset: FixedOffset,
}

impl<C, J, P> Terminal<C, J, P>
where
    C: ProductCatalog,
    J: SaleJournal,
    P: ReceiptPrinter,
{
    /// Creates a terminal with the default receipt configuration and a UTC
    /// store clock.
    pub fn new(catalog: C, journal: J, printer: P) -> Self {
        Terminal {
            catalog,
            journal,
            printer,
            cart: Cart::new(),
            workflow: None,
            settlement: None,
            receipt_config: ReceiptConfig::default(),
            store_offset: Utc.fix(),
        }
    }

    /// Overrides the receipt configuration.
    pub fn with_receipt_config(mut self, config: ReceiptConfig) -> Self {
        self.receipt_config = config;
        self
    }

    /// Sets the store's UTC offset, used for EOD hourly buckets.
    pub fn with_store_offset(mut self, offset: FixedOffset) -> Self {
        self.store_offset = offset;
        self
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// The in-progress cart (read-only; mutate through session methods).
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current payment phase, `Idle` when no capture is in flight.
    pub fn phase(&self) -> WorkflowPhase {
        self.workflow
            .as_ref()
            .map(|wf| wf.phase())
            .unwrap_or(WorkflowPhase::Idle)
    }

    /// The snapshotted amount due, while capturing.
    pub fn amount_due(&self) -> Option<Money> {
        self.workflow.as_ref().and_then(|wf| wf.amount_due())
    }

    /// Looks up a product by SKU and adds it to the cart, honoring any
    /// pending quantity multiplier.
    ///
    /// ## Errors
    /// - [`TerminalError::ProductNotFound`] - unknown SKU, cart unchanged
    /// - [`TerminalError::Core`] - cart rule violation or payment in flight
    pub async fn add_item(&mut self, sku: &str) -> TerminalResult<()> {
        self.ensure_cart_editable("add item")?;

        let product = self
            .catalog
            .find_by_sku(sku)
            .await
            .map_err(TerminalError::CatalogUnavailable)?
            .ok_or_else(|| TerminalError::ProductNotFound(sku.to_string()))?;

        self.cart.add_product(&product)?;
        info!(
            sku = %sku,
            item_count = self.cart.item_count(),
            total_cents = self.cart.total().cents(),
            "Item added"
        );
        Ok(())
    }

    /// Searches the catalog by name prefix (for the cashier's type-ahead).
    pub async fn search_products(&self, prefix: &str, limit: u32) -> TerminalResult<Vec<Product>> {
        self.catalog
            .find_by_name_prefix(prefix, limit)
            .await
            .map_err(TerminalError::CatalogUnavailable)
    }

    /// Arms (or toggles) the quantity multiplier for the next added item.
    pub fn set_multiplier(&mut self, n: i64) -> TerminalResult<()> {
        self.ensure_cart_editable("set multiplier")?;
        self.cart.set_multiplier(n);
        Ok(())
    }

    /// Removes the line at `index`; out-of-range is a silent no-op.
    pub fn remove_item(&mut self, index: usize) -> TerminalResult<()> {
        self.ensure_cart_editable("remove item")?;
        self.cart.remove_item(index);
        Ok(())
    }

    /// Abandons the whole sale: clears the cart and discards any capture
    /// or settled payment. Always succeeds.
    pub fn void_sale(&mut self) {
        info!(item_count = self.cart.item_count(), "Sale voided");
        self.cart.clear();
        self.workflow = None;
        self.settlement = None;
    }

    /// Cart edits are forbidden once a capture has begun: the amount due
    /// was snapshot at `begin_payment` and must not drift from the cart.
    fn ensure_cart_editable(&self, operation: &'static str) -> TerminalResult<()> {
        match self.phase() {
            WorkflowPhase::Idle => Ok(()),
            phase => Err(TerminalError::Core(CoreError::WrongPhase {
                operation,
                phase,
            })),
        }
    }

    // -------------------------------------------------------------------------
    // Payment
    // -------------------------------------------------------------------------

    /// Begins payment capture against the current cart, snapshotting the
    /// amount due. Locks the cart until commit, cancel or void.
    pub fn begin_payment(&mut self) -> TerminalResult<Money> {
        let wf = self.workflow.get_or_insert_with(PaymentWorkflow::new);
        let due = wf.begin(&self.cart)?;
        info!(due_cents = due.cents(), "Payment capture started");
        Ok(due)
    }

    /// Submits a tender against the snapshotted amount due. On success the
    /// settlement is held until [`Terminal::commit`]; the change due is
    /// returned for display.
    ///
    /// An insufficient tender leaves the capture open for a re-prompt.
    pub fn submit_tender(&mut self, amount: Money, method: PaymentMethod) -> TerminalResult<Money> {
        let wf = self
            .workflow
            .as_mut()
            .ok_or(TerminalError::Core(CoreError::WrongPhase {
                operation: "submit tender",
                phase: WorkflowPhase::Idle,
            }))?;

        let settlement = wf.submit_tender(amount, method)?;
        let change = settlement.change_due();
        info!(
            tendered_cents = settlement.tendered_cents,
            change_cents = settlement.change_cents,
            method = %settlement.method,
            "Tender accepted"
        );
        self.settlement = Some(settlement);
        Ok(change)
    }

    /// Abandons an open capture; the cart is preserved for further edits.
    pub fn cancel_payment(&mut self) -> TerminalResult<()> {
        let wf = self
            .workflow
            .as_mut()
            .ok_or(TerminalError::Core(CoreError::WrongPhase {
                operation: "cancel capture",
                phase: WorkflowPhase::Idle,
            }))?;

        wf.cancel()?;
        self.workflow = None;
        info!("Payment capture cancelled");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Commits the settled sale: stamps the commit time, snapshots the cart
    /// lines and writes everything to the journal in one atomic operation.
    ///
    /// ## At-Most-Once
    /// The held settlement is consumed only on success. On
    /// [`TerminalError::CommitFailed`] the cart and settlement are left
    /// intact so the commit can be retried without re-ringing or re-paying.
    pub async fn commit(&mut self) -> TerminalResult<Sale> {
        let settlement = self
            .settlement
            .as_ref()
            .ok_or(TerminalError::NothingToCommit)?;

        // amount_paid is the amount applied to the sale (= total); the raw
        // tender and the change handed back are not persisted
        let new_sale = NewSale {
            timestamp: Utc::now(),
            subtotal_cents: self.cart.subtotal().cents(),
            tax_cents: self.cart.tax().cents(),
            amount_paid_cents: self.cart.total().cents(),
            payment_method: settlement.method,
            items: self.cart.item_snapshots(),
        };

        match self.journal.save_sale_atomic(&new_sale).await {
            Ok(sale) => {
                // Consume session state only after the journal reported
                // durable success
                self.settlement = None;
                self.workflow = None;
                self.cart.clear();
                info!(
                    sale_id = sale.id,
                    total_cents = sale.total().cents(),
                    method = %sale.payment_method,
                    "Sale committed"
                );
                Ok(sale)
            }
            Err(e) => {
                warn!(error = %e, "Sale commit failed; cart and settlement preserved");
                Err(TerminalError::CommitFailed(e))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Receipt & EOD
    // -------------------------------------------------------------------------

    /// Renders the sale as a receipt document without printing it.
    pub fn render_receipt(&self, sale: &Sale) -> String {
        receipt::format(sale, &self.receipt_config)
    }

    /// Prints the receipt for a committed sale (print, cut, flush).
    ///
    /// A failure here is reported but the sale stays committed; callers
    /// may retry, the document renders identically every time.
    pub async fn print_receipt(&mut self, sale: &Sale) -> TerminalResult<()> {
        let document = receipt::format(sale, &self.receipt_config);

        self.printer
            .print(&document)
            .await
            .map_err(TerminalError::PrinterUnavailable)?;
        self.printer
            .cut()
            .await
            .map_err(TerminalError::PrinterUnavailable)?;
        self.printer
            .flush()
            .await
            .map_err(TerminalError::PrinterUnavailable)?;

        info!(sale_id = sale.id, "Receipt printed");
        Ok(())
    }

    /// Builds the end-of-day summary and rendered report for a business
    /// day. An empty day yields a valid all-zero report.
    pub async fn eod_report(&self, date: NaiveDate) -> TerminalResult<(EodSummary, String)> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = (date + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();

        let sales = self
            .journal
            .sales_in_range(start, end)
            .await
            .map_err(TerminalError::EodQueryFailed)?;

        info!(date = %date, sale_count = sales.len(), "Building EOD report");

        let summary = eod::summarize(&sales, date, self.store_offset);
        let report = eod::render(&summary, &self.receipt_config);
        Ok((summary, report))
    }
}
