//! # Collaborator Traits
//!
//! The session engine talks to the outside world through three async
//! traits: the product catalog, the sale journal and the receipt printer.
//! Production wires them to SQLite repositories and a hardware printer;
//! tests wire in fakes that fail on command.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BoxError;
use storepro_core::types::{NewSale, Product, Sale};

// =============================================================================
// Product Catalog
// =============================================================================

/// Read-only product lookup.
///
/// `Ok(None)` / an empty Vec means "no match"; `Err` means the catalog
/// itself failed (disk, network, ...).
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Looks up a single product by SKU.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, BoxError>;

    /// Finds products whose name starts with the given prefix.
    async fn find_by_name_prefix(
        &self,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<Product>, BoxError>;
}

// =============================================================================
// Sale Journal
// =============================================================================

/// Durable storage for committed sales.
#[async_trait]
pub trait SaleJournal: Send + Sync {
    /// Persists the sale and all of its items atomically, returning the
    /// stored sale with its assigned id. All-or-nothing: on `Err`, nothing
    /// was persisted.
    async fn save_sale_atomic(&self, sale: &NewSale) -> Result<Sale, BoxError>;

    /// Returns all sales with `start <= timestamp < end`, oldest first.
    async fn sales_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, BoxError>;
}

// =============================================================================
// Receipt Printer
// =============================================================================

/// A line printer for finished documents.
///
/// Printing happens after commit; a printer failure never un-commits a
/// sale, the document can simply be re-printed.
#[async_trait]
pub trait ReceiptPrinter: Send + Sync {
    /// Sends a rendered document to the printer.
    async fn print(&mut self, document: &str) -> Result<(), BoxError>;

    /// Cuts the paper.
    async fn cut(&mut self) -> Result<(), BoxError>;

    /// Flushes any buffered output to the device.
    async fn flush(&mut self) -> Result<(), BoxError>;
}

/// A printer that swallows everything. For headless terminals and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPrinter;

#[async_trait]
impl ReceiptPrinter for NullPrinter {
    async fn print(&mut self, _document: &str) -> Result<(), BoxError> {
        Ok(())
    }

    async fn cut(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}
