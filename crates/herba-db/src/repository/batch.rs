//! # Batch Repository
//!
//! Reads over batch rows, and the transaction-scoped write primitives
//! the ledger builds on.
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Reads (any caller)          Writes (ledger/checkout only)      │
//! │  ──────────────────          ─────────────────────────────      │
//! │  get_by_id                   insert_tx        (goods receipt)   │
//! │  available_for_product       apply_delta_tx   (sale/adjust)     │
//! │  list_available                                                 │
//! │  total_stock                 Both take &mut SqliteConnection    │
//! │                              and only run inside a transaction  │
//! │                              owned by an engine, under locks.   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{LedgerError, LedgerResult};
use herba_core::Batch;

const BATCH_COLUMNS: &str =
    "id, product_id, batch_number, expiry_date, quantity, created_at, updated_at";

/// Repository for batch reads.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    pool: SqlitePool,
}

impl BatchRepository {
    /// Creates a new BatchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BatchRepository { pool }
    }

    /// Gets a batch by ID.
    pub async fn get_by_id(&self, id: &str) -> LedgerResult<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    /// Gets a product's batches with stock remaining, FEFO order
    /// (expiry ascending, id as tiebreak).
    ///
    /// This is the allocator's candidate list and also what the
    /// inventory screen shows: soonest-to-expire lots first.
    pub async fn available_for_product(&self, product_id: &str) -> LedgerResult<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS}
             FROM batches
             WHERE product_id = ?1 AND quantity > 0
             ORDER BY expiry_date, id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Gets ALL of a product's batches, including drained ones.
    pub async fn all_for_product(&self, product_id: &str) -> LedgerResult<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS}
             FROM batches
             WHERE product_id = ?1
             ORDER BY expiry_date, id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Lists every batch with stock remaining, FEFO order across all
    /// products.
    pub async fn list_available(&self) -> LedgerResult<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS}
             FROM batches
             WHERE quantity > 0
             ORDER BY expiry_date, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Total stock for a product: the sum over its batches.
    pub async fn total_stock(&self, product_id: &str) -> LedgerResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(quantity) FROM batches WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    // =========================================================================
    // Transaction-scoped writes (engines only)
    // =========================================================================

    /// Inserts a new batch row inside the caller's transaction.
    pub(crate) async fn insert_tx(conn: &mut SqliteConnection, batch: &Batch) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO batches (id, product_id, batch_number, expiry_date, quantity, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&batch.id)
        .bind(&batch.product_id)
        .bind(&batch.batch_number)
        .bind(batch.expiry_date)
        .bind(batch.quantity)
        .bind(batch.created_at)
        .bind(batch.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Applies a signed quantity delta inside the caller's transaction.
    ///
    /// The SQL guard (`quantity + delta >= 0`) re-checks the
    /// non-negative invariant at the row itself; callers run under the
    /// batch lock and have already validated, so a rejected guard is an
    /// invariant breach, not a user error.
    pub(crate) async fn apply_delta_tx(
        conn: &mut SqliteConnection,
        batch_id: &str,
        delta: i64,
    ) -> LedgerResult<()> {
        let result = sqlx::query(
            "UPDATE batches
             SET quantity = quantity + ?2, updated_at = ?3
             WHERE id = ?1 AND quantity + ?2 >= 0",
        )
        .bind(batch_id)
        .bind(delta)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::Internal(format!(
                "stock guard rejected delta {delta} on batch {batch_id}"
            )));
        }

        Ok(())
    }
}
