//! # Price Repository
//!
//! Per-segment price rows. One row per (product, segment); the checkout
//! engine reads these and snapshots the resolved price onto order
//! lines, so later edits here never alter past orders.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::LedgerResult;
use herba_core::{CustomerSegment, Price};

/// Repository for product price rows.
#[derive(Debug, Clone)]
pub struct PriceRepository {
    pool: SqlitePool,
}

impl PriceRepository {
    /// Creates a new PriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PriceRepository { pool }
    }

    /// Gets all price rows for a product (at most one per segment).
    pub async fn prices_for_product(&self, product_id: &str) -> LedgerResult<Vec<Price>> {
        let prices = sqlx::query_as::<_, Price>(
            "SELECT id, product_id, segment, price
             FROM product_prices
             WHERE product_id = ?1
             ORDER BY segment",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(prices)
    }

    /// Inserts or updates the price for a (product, segment) pair
    /// (master-data/seed tooling).
    pub async fn upsert(
        &self,
        product_id: &str,
        segment: CustomerSegment,
        price: i64,
    ) -> LedgerResult<()> {
        debug!(product_id = %product_id, segment = %segment, price = %price, "Upserting price");

        sqlx::query(
            "INSERT INTO product_prices (id, product_id, segment, price)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (product_id, segment) DO UPDATE SET price = excluded.price",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(product_id)
        .bind(segment)
        .bind(price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
