//! # Terminal Error Types
//!
//! Errors surfaced by the session engine to whatever UI drives it.
//! Collaborator failures (catalog, journal, printer) are carried as boxed
//! sources so the traits stay implementation-agnostic.

use thiserror::Error;

use storepro_core::CoreError;

/// Boxed error type used at the collaborator trait boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Session engine errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// No product with the given SKU exists in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// A cart or payment business rule was violated.
    /// The session state is unchanged; re-prompt the cashier.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The catalog collaborator failed (not "no match" - an actual failure).
    #[error("catalog unavailable")]
    CatalogUnavailable(#[source] BoxError),

    /// The sale journal rejected or failed the atomic commit.
    ///
    /// ## Recovery
    /// Cart and settlement are preserved: the cashier retries the commit,
    /// they do not re-ring the sale.
    #[error("sale commit failed")]
    CommitFailed(#[source] BoxError),

    /// Commit requested without a settled payment.
    #[error("no settled payment to commit")]
    NothingToCommit,

    /// The receipt printer failed. The sale is already committed; this is
    /// never a reason to roll anything back.
    #[error("printer unavailable")]
    PrinterUnavailable(#[source] BoxError),

    /// The end-of-day sales query failed.
    #[error("end-of-day query failed")]
    EodQueryFailed(#[source] BoxError),
}

/// Result type for terminal operations.
pub type TerminalResult<T> = Result<T, TerminalError>;
