//! # SQLite Collaborator Wiring
//!
//! Implements the catalog and journal traits over the storepro-db
//! repositories, so a production terminal is assembled as:
//!
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("store.db")).await?;
//! let terminal = Terminal::new(db.products(), db.sales(), NullPrinter);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::collab::{ProductCatalog, SaleJournal};
use crate::error::BoxError;
use storepro_core::types::{NewSale, Product, Sale};
use storepro_db::{ProductRepository, SaleRepository};

#[async_trait]
impl ProductCatalog for ProductRepository {
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, BoxError> {
        Ok(self.get_by_sku(sku).await?)
    }

    async fn find_by_name_prefix(
        &self,
        prefix: &str,
        limit: u32,
    ) -> Result<Vec<Product>, BoxError> {
        Ok(self.search_by_name_prefix(prefix, limit).await?)
    }
}

#[async_trait]
impl SaleJournal for SaleRepository {
    async fn save_sale_atomic(&self, sale: &NewSale) -> Result<Sale, BoxError> {
        Ok(SaleRepository::save_sale_atomic(self, sale).await?)
    }

    async fn sales_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, BoxError> {
        Ok(self.query_sales_in_range(start, end).await?)
    }
}
