//! # Sale Repository
//!
//! Database operations for committed sales and their item snapshots.
//!
//! ## Commit Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    save_sale_atomic(new_sale)                           │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                      │
//! │       │                                                                 │
//! │       ├── INSERT INTO sales (...)          → id = last_insert_rowid    │
//! │       ├── INSERT INTO sale_items (...)     × N, position 0..N          │
//! │       │                                                                 │
//! │  COMMIT                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale { id, items } — or NOTHING persisted at all                       │
//! │                                                                         │
//! │  A sale with items missing would be unreceiptable, so the header and   │
//! │  its items land in one transaction or not at all.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use storepro_core::types::{NewSale, PaymentMethod, Sale, SaleItem};

/// Row shape of the `sales` table.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    timestamp: DateTime<Utc>,
    subtotal_cents: i64,
    tax_cents: i64,
    amount_paid_cents: i64,
    payment_method: String,
}

impl SaleRow {
    /// Maps the row to a domain Sale with the given items.
    fn into_sale(self, items: Vec<SaleItem>) -> DbResult<Sale> {
        let payment_method: PaymentMethod = self
            .payment_method
            .parse()
            .map_err(DbError::CorruptRow)?;

        Ok(Sale {
            id: self.id,
            timestamp: self.timestamp,
            subtotal_cents: self.subtotal_cents,
            tax_cents: self.tax_cents,
            amount_paid_cents: self.amount_paid_cents,
            payment_method,
            items,
        })
    }
}

/// Row shape of the `sale_items` table.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: i64,
    sku_snapshot: String,
    name_snapshot: String,
    unit_cost_cents: i64,
    tax_rate_bps: u32,
    quantity: i64,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        SaleItem {
            id: row.id,
            sale_id: row.sale_id,
            sku: row.sku_snapshot,
            name: row.name_snapshot,
            unit_cost_cents: row.unit_cost_cents,
            tax_rate_bps: row.tax_rate_bps,
            quantity: row.quantity,
        }
    }
}

const SALE_COLUMNS: &str =
    "id, timestamp, subtotal_cents, tax_cents, amount_paid_cents, payment_method";

const SALE_ITEM_COLUMNS: &str =
    "id, sale_id, sku_snapshot, name_snapshot, unit_cost_cents, tax_rate_bps, quantity";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a sale and all its item snapshots in one transaction.
    ///
    /// Returns the stored [`Sale`] with its assigned id (the receipt order
    /// number derives from it) and item row ids.
    ///
    /// ## Errors
    /// - [`DbError::EmptySale`] if the sale has no items
    /// - Any sqlx failure rolls the whole transaction back: no partial
    ///   sale is ever visible
    pub async fn save_sale_atomic(&self, new_sale: &NewSale) -> DbResult<Sale> {
        if new_sale.items.is_empty() {
            return Err(DbError::EmptySale);
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (
                timestamp, subtotal_cents, tax_cents,
                amount_paid_cents, payment_method
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(new_sale.timestamp)
        .bind(new_sale.subtotal_cents)
        .bind(new_sale.tax_cents)
        .bind(new_sale.amount_paid_cents)
        .bind(new_sale.payment_method.as_str())
        .execute(&mut *tx)
        .await?;

        let sale_id = result.last_insert_rowid();
        debug!(sale_id, item_count = new_sale.items.len(), "Inserting sale");

        let mut items = Vec::with_capacity(new_sale.items.len());
        for (position, item) in new_sale.items.iter().enumerate() {
            let item_id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, position, sku_snapshot, name_snapshot,
                    unit_cost_cents, tax_rate_bps, quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item_id)
            .bind(sale_id)
            .bind(position as i64)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(item.unit_cost_cents)
            .bind(item.tax_rate_bps)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            items.push(SaleItem {
                id: item_id,
                sale_id,
                sku: item.sku.clone(),
                name: item.name.clone(),
                unit_cost_cents: item.unit_cost_cents,
                tax_rate_bps: item.tax_rate_bps,
                quantity: item.quantity,
            });
        }

        tx.commit().await?;

        debug!(sale_id, "Sale committed");

        Ok(Sale {
            id: sale_id,
            timestamp: new_sale.timestamp,
            subtotal_cents: new_sale.subtotal_cents,
            tax_cents: new_sale.tax_cents,
            amount_paid_cents: new_sale.amount_paid_cents,
            payment_method: new_sale.payment_method,
            items,
        })
    }

    /// Gets a sale (with its items, in position order) by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let item_rows: Vec<SaleItemRow> = sqlx::query_as(&format!(
            "SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY position"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows.into_iter().map(SaleItem::from).collect();
        Ok(Some(row.into_sale(items)?))
    }

    /// Returns all sales with `start <= timestamp < end`, oldest first,
    /// each with its items in position order.
    ///
    /// The half-open window is what EOD wants: a sale stamped exactly at
    /// midnight belongs to the next day.
    pub async fn query_sales_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        debug!(start = %start, end = %end, "Querying sales in range");

        let sale_rows: Vec<SaleRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SALE_COLUMNS} FROM sales
            WHERE timestamp >= ?1 AND timestamp < ?2
            ORDER BY timestamp, id
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let item_rows: Vec<SaleItemRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SALE_ITEM_COLUMNS} FROM sale_items
            WHERE sale_id IN (
                SELECT id FROM sales WHERE timestamp >= ?1 AND timestamp < ?2
            )
            ORDER BY sale_id, position
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_sale: std::collections::HashMap<i64, Vec<SaleItem>> =
            std::collections::HashMap::new();
        for row in item_rows {
            items_by_sale
                .entry(row.sale_id)
                .or_default()
                .push(SaleItem::from(row));
        }

        let mut sales = Vec::with_capacity(sale_rows.len());
        for row in sale_rows {
            let items = items_by_sale.remove(&row.id).unwrap_or_default();
            sales.push(row.into_sale(items)?);
        }

        debug!(count = sales.len(), "Range query returned sales");
        Ok(sales)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
