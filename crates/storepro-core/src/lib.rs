//! # storepro-core: Pure Business Logic for StorePro
//!
//! This crate is the heart of the StorePro terminal. It contains the sale
//! transaction and settlement engine as pure functions and value types with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     StorePro Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │              storepro-terminal (session engine)               │ │
//! │  │   add_item ──► begin_payment ──► commit ──► print ──► EOD     │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │              ★ storepro-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │  ┌───────┐ ┌──────┐ ┌─────────┐ ┌─────────┐ ┌─────┐          │ │
//! │  │  │ money │ │ cart │ │ payment │ │ receipt │ │ eod │          │ │
//! │  │  └───────┘ └──────┘ └─────────┘ └─────────┘ └─────┘          │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └─────────────────────────────┬─────────────────────────────────┘ │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐ │
//! │  │              storepro-db (SQLite persistence)                 │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleItem, Settlement, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The in-progress sale: line items, multiplier, derived totals
//! - [`payment`] - Tender capture state machine producing a Settlement
//! - [`receipt`] - Fixed-width receipt formatting for a committed sale
//! - [`eod`] - End-of-day aggregation and report rendering
//! - [`layout`] - Shared fixed-width text helpers (receipt + EOD)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same cart, same totals; same sale, same receipt
//! 2. **No I/O**: database, network, printer access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), rounded ONCE
//!    at the display/commit boundary, never per intermediate step
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod eod;
pub mod error;
pub mod layout;
pub mod money;
pub mod payment;
pub mod receipt;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storepro_core::Money` instead of
// `use storepro_core::money::Money`

pub use cart::{Cart, LineItem};
pub use error::{CoreError, CoreResult};
pub use eod::{render as render_eod, summarize, EodSummary, ProductTotal};
pub use money::{Money, TaxAccumulator};
pub use payment::{PaymentWorkflow, WorkflowPhase};
pub use receipt::ReceiptConfig;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Width of the zero-padded order number printed on receipts.
/// `42` becomes `000000042`.
pub const ORDER_NUMBER_WIDTH: usize = 9;
