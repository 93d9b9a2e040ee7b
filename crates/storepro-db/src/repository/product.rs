//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - SKU lookup (the scan/tap path on the terminal)
//! - Name-prefix search (the cashier typing a few letters)
//! - Price updates
//!
//! Sales never mutate this table: committed sale items carry their own
//! frozen copies of the product fields.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storepro_core::types::Product;

/// Row shape of the `products` table.
///
/// Kept separate from the domain type so schema details (column names,
/// SQLite integer widths) stay inside this crate.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    sku: String,
    name: String,
    unit_cost_cents: i64,
    tax_rate_bps: u32,
    qty_on_hand: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            sku: row.sku,
            name: row.name,
            unit_cost_cents: row.unit_cost_cents,
            tax_rate_bps: row.tax_rate_bps,
            qty_on_hand: row.qty_on_hand,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "sku, name, unit_cost_cents, tax_rate_bps, qty_on_hand, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let product = repo.get_by_sku("FC-001").await?;
/// let matches = repo.search_by_name_prefix("fish", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// [`DbError::UniqueViolation`] if the SKU already exists.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                sku, name, unit_cost_cents, tax_rate_bps, qty_on_hand,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.unit_cost_cents)
        .bind(product.tax_rate_bps)
        .bind(product.qty_on_hand)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Searches products whose name starts with the given prefix,
    /// case-insensitively, ordered by name.
    ///
    /// An empty prefix matches everything up to `limit`.
    pub async fn search_by_name_prefix(&self, prefix: &str, limit: u32) -> DbResult<Vec<Product>> {
        let prefix = prefix.trim();
        debug!(prefix = %prefix, limit = %limit, "Searching products by name prefix");

        // Escape LIKE metacharacters so a literal '%' in a product name
        // can't widen the match
        let escaped = prefix.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        let pattern = format!("{escaped}%");

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY name
            LIMIT ?2
            "#
        ))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Returns the number of products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Updates a product's unit cost. Committed sales are unaffected:
    /// their items carry snapshot prices.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] if the SKU doesn't exist.
    pub async fn update_price(&self, sku: &str, unit_cost_cents: i64) -> DbResult<()> {
        debug!(sku = %sku, unit_cost_cents, "Updating product price");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET unit_cost_cents = ?1, updated_at = ?2
            WHERE sku = ?3
            "#,
        )
        .bind(unit_cost_cents)
        .bind(chrono::Utc::now())
        .bind(sku)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", sku));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn product(sku: &str, name: &str, cents: i64) -> Product {
        Product {
            sku: sku.to_string(),
            name: name.to_string(),
            unit_cost_cents: cents,
            tax_rate_bps: 1500,
            qty_on_hand: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_by_sku() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("FC-001", "Fish Cake", 389)).await.unwrap();

        let found = repo.get_by_sku("FC-001").await.unwrap().unwrap();
        assert_eq!(found.name, "Fish Cake");
        assert_eq!(found.unit_cost_cents, 389);
        assert_eq!(found.tax_rate_bps, 1500);

        assert!(repo.get_by_sku("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("FC-001", "Fish Cake", 389)).await.unwrap();
        let err = repo.insert(&product("FC-001", "Other", 100)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_by_name_prefix() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("P-001", "Poutine", 332)).await.unwrap();
        repo.insert(&product("P-002", "Pop", 150)).await.unwrap();
        repo.insert(&product("F-001", "Fish Cake", 389)).await.unwrap();

        let hits = repo.search_by_name_prefix("Po", 20).await.unwrap();
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Pop", "Poutine"]);

        let all = repo.search_by_name_prefix("", 20).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(repo.count().await.unwrap(), 3);

        let limited = repo.search_by_name_prefix("", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_update_price() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&product("FC-001", "Fish Cake", 389)).await.unwrap();
        repo.update_price("FC-001", 425).await.unwrap();

        let found = repo.get_by_sku("FC-001").await.unwrap().unwrap();
        assert_eq!(found.unit_cost_cents, 425);

        let err = repo.update_price("NOPE", 100).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
