//! # Inventory Ledger
//!
//! The durable store of stock batches and the operations that mutate
//! them. Batch quantities change through exactly three paths, each a
//! single SQLite transaction writing its audit row alongside the
//! mutation:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Inventory Ledger                           │
//! │                                                                 │
//! │  receive_goods ──► INSERT batch      + movement(receipt, +qty)  │
//! │                                                                 │
//! │  adjust_stock ───► UPDATE batch ± Δ  + movement(adjustment, Δ)  │
//! │                    (rejected if the result would be negative)   │
//! │                                                                 │
//! │  deduct_for_sale ► UPDATE batches -n + movement(sale, -n) each  │
//! │                    (crate-private; checkout engine only)        │
//! │                                                                 │
//! │  Each runs under the batch lock manager, so per-batch mutation  │
//! │  order is strictly serialized.                                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::locks::BatchLockManager;
use crate::repository::batch::BatchRepository;
use crate::repository::movement::StockMovementRepository;
use herba_core::validation::validate_batch_number;
use herba_core::{Allocation, Batch, CoreError, MovementReason, StockMovement, ValidationError};

// =============================================================================
// Requests
// =============================================================================

/// A goods receipt: new stock arriving from a supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveGoods {
    pub product_id: String,
    /// Printed lot number. Free text; receipts with the same number
    /// still create separate batch rows.
    pub batch_number: String,
    /// Expiry dates in the past are accepted: receiving already-expired
    /// stock is a business decision, not an input error.
    pub expiry_date: NaiveDate,
    pub quantity: i64,
    pub user_id: String,
    pub notes: Option<String>,
}

/// A manual stock correction: damage, loss, recount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustStock {
    pub batch_id: String,
    /// Signed correction; must not be zero.
    pub delta: i64,
    pub notes: Option<String>,
    pub user_id: String,
}

// =============================================================================
// Ledger
// =============================================================================

/// Executes goods receipts and stock adjustments.
///
/// Obtained from [`crate::Database::ledger`]; instances share the
/// database's pool and lock manager.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    pool: SqlitePool,
    locks: Arc<BatchLockManager>,
    lock_wait: Duration,
}

impl InventoryLedger {
    pub(crate) fn new(pool: SqlitePool, locks: Arc<BatchLockManager>, lock_wait: Duration) -> Self {
        InventoryLedger {
            pool,
            locks,
            lock_wait,
        }
    }

    /// Receives new stock, creating a batch row and its receipt
    /// movement in one transaction.
    ///
    /// ## Returns
    /// The created batch (its `id` is the new batch id).
    ///
    /// ## Errors
    /// - `Validation` for non-positive quantity or blank batch number
    /// - `NotFound` for an unknown product id
    pub async fn receive_goods(&self, receipt: ReceiveGoods) -> LedgerResult<Batch> {
        if receipt.quantity <= 0 {
            return Err(CoreError::from(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            })
            .into());
        }
        validate_batch_number(&receipt.batch_number).map_err(CoreError::from)?;

        let product = sqlx::query_scalar::<_, String>("SELECT id FROM products WHERE id = ?1")
            .bind(&receipt.product_id)
            .fetch_optional(&self.pool)
            .await?;
        if product.is_none() {
            return Err(LedgerError::not_found("Product", &receipt.product_id));
        }

        let batch = Batch::new(
            &receipt.product_id,
            &receipt.batch_number,
            receipt.expiry_date,
            receipt.quantity,
        );

        // A fresh UUID cannot contend, but every batch mutation goes
        // through the guard.
        let _lock = self.locks.lock_one(&batch.id, self.lock_wait).await?;

        let mut tx = self.pool.begin().await?;

        BatchRepository::insert_tx(&mut tx, &batch).await?;
        StockMovementRepository::append_tx(
            &mut tx,
            &movement(
                &batch.id,
                receipt.quantity,
                MovementReason::Receipt,
                Some(batch.id.clone()),
                &receipt.user_id,
                receipt.notes.clone(),
            ),
        )
        .await?;

        tx.commit().await?;

        info!(
            batch_id = %batch.id,
            product_id = %batch.product_id,
            quantity = %batch.quantity,
            "Goods received"
        );

        Ok(batch)
    }

    /// Applies a signed correction to a batch.
    ///
    /// ## Returns
    /// The batch's new quantity.
    ///
    /// ## Errors
    /// - `Validation` for a zero delta
    /// - `NotFound` for an unknown batch id
    /// - `InvalidAdjustment` if the result would be negative (the batch
    ///   is left unchanged)
    pub async fn adjust_stock(&self, adjustment: AdjustStock) -> LedgerResult<i64> {
        if adjustment.delta == 0 {
            return Err(CoreError::from(ValidationError::InvalidFormat {
                field: "delta".to_string(),
                reason: "must not be zero".to_string(),
            })
            .into());
        }

        let _lock = self
            .locks
            .lock_one(&adjustment.batch_id, self.lock_wait)
            .await?;

        let mut tx = self.pool.begin().await?;

        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM batches WHERE id = ?1")
                .bind(&adjustment.batch_id)
                .fetch_optional(&mut *tx)
                .await?;

        let quantity = quantity
            .ok_or_else(|| LedgerError::not_found("Batch", &adjustment.batch_id))?;

        let new_quantity = quantity + adjustment.delta;
        if new_quantity < 0 {
            return Err(CoreError::InvalidAdjustment {
                batch_id: adjustment.batch_id.clone(),
                quantity,
                delta: adjustment.delta,
            }
            .into());
        }

        BatchRepository::apply_delta_tx(&mut tx, &adjustment.batch_id, adjustment.delta).await?;
        StockMovementRepository::append_tx(
            &mut tx,
            &movement(
                &adjustment.batch_id,
                adjustment.delta,
                MovementReason::Adjustment,
                None,
                &adjustment.user_id,
                adjustment.notes.clone(),
            ),
        )
        .await?;

        tx.commit().await?;

        info!(
            batch_id = %adjustment.batch_id,
            delta = %adjustment.delta,
            new_quantity = %new_quantity,
            "Stock adjusted"
        );

        Ok(new_quantity)
    }

    /// Deducts an allocation plan inside the checkout transaction.
    ///
    /// Crate-private: only the checkout engine calls this, after every
    /// cart line has been allocated under the batch locks. One sale
    /// movement per batch, referencing the order.
    pub(crate) async fn deduct_for_sale(
        conn: &mut SqliteConnection,
        allocations: &[Allocation],
        order_id: &str,
        user_id: &str,
    ) -> LedgerResult<()> {
        for allocation in allocations {
            debug!(
                batch_id = %allocation.batch_id,
                quantity = %allocation.quantity,
                order_id = %order_id,
                "Deducting stock for sale"
            );

            BatchRepository::apply_delta_tx(conn, &allocation.batch_id, -allocation.quantity)
                .await?;
            StockMovementRepository::append_tx(
                conn,
                &movement(
                    &allocation.batch_id,
                    -allocation.quantity,
                    MovementReason::Sale,
                    Some(order_id.to_string()),
                    user_id,
                    None,
                ),
            )
            .await?;
        }

        Ok(())
    }
}

/// Builds a movement row with a fresh UUID.
fn movement(
    batch_id: &str,
    delta: i64,
    reason: MovementReason,
    ref_id: Option<String>,
    user_id: &str,
    notes: Option<String>,
) -> StockMovement {
    StockMovement {
        id: Uuid::new_v4().to_string(),
        batch_id: batch_id.to_string(),
        delta,
        reason,
        ref_id,
        user_id: user_id.to_string(),
        notes,
        created_at: Utc::now(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
