//! # Stock Movement Repository
//!
//! The append-only audit trail of batch quantity changes.
//!
//! Every ledger write inserts its movement row in the SAME transaction
//! as the batch mutation it records, so for any batch the prefix sums
//! of `delta` in application order always equal the batch's current
//! quantity. Rows are never updated or deleted.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::LedgerResult;
use herba_core::StockMovement;

/// Repository for the stock movement log.
#[derive(Debug, Clone)]
pub struct StockMovementRepository {
    pool: SqlitePool,
}

impl StockMovementRepository {
    /// Creates a new StockMovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockMovementRepository { pool }
    }

    /// Lists a batch's movements in application order.
    ///
    /// Ordered by rowid rather than timestamp: rows written in one
    /// transaction share a timestamp, rowid preserves insert order.
    pub async fn list_for_batch(&self, batch_id: &str) -> LedgerResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, batch_id, delta, reason, ref_id, user_id, notes, created_at
             FROM stock_movements
             WHERE batch_id = ?1
             ORDER BY rowid",
        )
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Lists the movements recorded for an order (one per batch drawn).
    pub async fn list_for_ref(&self, ref_id: &str) -> LedgerResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, batch_id, delta, reason, ref_id, user_id, notes, created_at
             FROM stock_movements
             WHERE ref_id = ?1
             ORDER BY rowid",
        )
        .bind(ref_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    // =========================================================================
    // Transaction-scoped writes (engines only)
    // =========================================================================

    /// Appends a movement row inside the caller's transaction.
    pub(crate) async fn append_tx(
        conn: &mut SqliteConnection,
        movement: &StockMovement,
    ) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO stock_movements (id, batch_id, delta, reason, ref_id, user_id, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&movement.id)
        .bind(&movement.batch_id)
        .bind(movement.delta)
        .bind(movement.reason)
        .bind(&movement.ref_id)
        .bind(&movement.user_id)
        .bind(&movement.notes)
        .bind(movement.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
