//! # Error Types
//!
//! Domain-specific error types for storepro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  storepro-core errors (this file)                                   │
//! │  └── CoreError       - Cart and payment workflow rule violations    │
//! │                                                                     │
//! │  storepro-db errors (separate crate)                                │
//! │  └── DbError         - Database operation failures                  │
//! │                                                                     │
//! │  storepro-terminal errors (separate crate)                          │
//! │  └── TerminalError   - Lookup/commit/print failures + CoreError     │
//! │                                                                     │
//! │  Flow: CoreError ──► TerminalError ──► caller (UI re-prompts)       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (amounts, limits)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::payment::WorkflowPhase;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations. They are all *local*
/// failures: the cart and any captured tender are left untouched, and the
/// caller re-prompts the cashier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A payment cannot begin (or a sale commit) against an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed distinct items.
    #[error("cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Tendered amount is below the amount due.
    ///
    /// ## Policy
    /// No partial/layaway payments: the workflow stays in Capturing and
    /// the cashier re-prompts for tender. Accepting a short tender would
    /// leak negative-due states into commit and EOD.
    #[error("insufficient payment: tendered {tendered_cents} cents against {due_cents} cents due")]
    InsufficientPayment {
        due_cents: i64,
        tendered_cents: i64,
    },

    /// Operation attempted in a workflow phase that does not allow it.
    ///
    /// ## When This Occurs
    /// - `submit_tender` before `begin` or after settle/cancel
    /// - `begin` on an already-used workflow (instances are single-use)
    #[error("payment workflow is {phase:?}, cannot {operation}")]
    WrongPhase {
        operation: &'static str,
        phase: WorkflowPhase,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
