//! # Product Repository
//!
//! Read access to product master data, plus insert tooling for seeding.
//! The ledger and checkout engines only ever read products.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::LedgerResult;
use herba_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, sku, name, barcode, category_id, unit, min_stock, created_at, updated_at";

/// Repository for product lookups.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> LedgerResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> LedgerResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1"
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products ordered by name.
    pub async fn list(&self, limit: u32) -> LedgerResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product (master-data/seed tooling).
    ///
    /// ## Errors
    /// `LedgerError::UniqueViolation` if the SKU already exists.
    pub async fn insert(&self, product: &Product) -> LedgerResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, sku, name, barcode, category_id, unit, min_stock, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.category_id)
        .bind(&product.unit)
        .bind(product.min_stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a category row (master-data/seed tooling).
    pub async fn insert_category(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
    ) -> LedgerResult<()> {
        sqlx::query("INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(name)
            .bind(description)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Counts products (for diagnostics and seed idempotence).
    pub async fn count(&self) -> LedgerResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to build a product with a fresh UUID.
pub fn new_product(sku: &str, name: &str, unit: &str, min_stock: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        sku: sku.to_string(),
        name: name.to_string(),
        barcode: None,
        category_id: None,
        unit: unit.to_string(),
        min_stock,
        created_at: now,
        updated_at: now,
    }
}
