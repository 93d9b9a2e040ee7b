//! # storepro-terminal: Session Engine for StorePro
//!
//! Orchestrates one cashier session over the pure core and the SQLite
//! layer: cart edits, payment capture, atomic commit, receipt printing
//! and end-of-day reporting.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 storepro-terminal (THIS CRATE)                          │
//! │                                                                         │
//! │   ┌─────────────────────────────────────────────────────────────────┐  │
//! │   │  Terminal<C, J, P>                (session.rs)                  │  │
//! │   │    owns: Cart, Option<PaymentWorkflow>, Option<Settlement>      │  │
//! │   └───────┬───────────────────┬───────────────────┬─────────────────┘  │
//! │           │                   │                   │                    │
//! │   ProductCatalog        SaleJournal        ReceiptPrinter  (collab.rs) │
//! │           │                   │                   │                    │
//! │   ProductRepository     SaleRepository      NullPrinter /              │
//! │   (storepro-db)         (storepro-db)       hardware driver            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storepro_db::{Database, DbConfig};
//! use storepro_terminal::{NullPrinter, Terminal};
//!
//! let db = Database::new(DbConfig::new("store.db")).await?;
//! let mut terminal = Terminal::new(db.products(), db.sales(), NullPrinter);
//!
//! terminal.add_item("FC-001").await?;
//! let due = terminal.begin_payment()?;
//! terminal.submit_tender(due, PaymentMethod::Cash)?;
//! let sale = terminal.commit().await?;
//! terminal.print_receipt(&sale).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collab;
pub mod error;
pub mod session;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use collab::{NullPrinter, ProductCatalog, ReceiptPrinter, SaleJournal};
pub use error::{BoxError, TerminalError, TerminalResult};
pub use session::Terminal;
