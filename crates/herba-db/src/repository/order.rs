//! # Order Repository
//!
//! Orders and their line items.
//!
//! ## Snapshot Pattern
//! The unit price on each line is the price resolved at sale time.
//! Orders are immutable after insert; the reporting layer reads them,
//! nothing rewrites them.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::LedgerResult;
use herba_core::{Order, OrderLine};

const ORDER_COLUMNS: &str =
    "id, customer_id, user_id, payment_method, total, amount_paid, change, status, notes, created_at";

/// Repository for order reads and tx-scoped inserts.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> LedgerResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all lines for an order.
    pub async fn lines_for_order(&self, order_id: &str) -> LedgerResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT id, order_id, product_id, quantity, unit_price
             FROM order_lines
             WHERE order_id = ?1
             ORDER BY rowid",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    // TODO: void transition (restock + movement reversal) once the
    // returns flow is specified.

    // =========================================================================
    // Transaction-scoped writes (checkout engine only)
    // =========================================================================

    /// Inserts the order header inside the caller's transaction.
    pub(crate) async fn insert_order_tx(
        conn: &mut SqliteConnection,
        order: &Order,
    ) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO orders (id, customer_id, user_id, payment_method, total, amount_paid, change, status, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(&order.user_id)
        .bind(order.payment_method)
        .bind(order.total)
        .bind(order.amount_paid)
        .bind(order.change)
        .bind(order.status)
        .bind(&order.notes)
        .bind(order.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Inserts one order line inside the caller's transaction.
    pub(crate) async fn insert_line_tx(
        conn: &mut SqliteConnection,
        line: &OrderLine,
    ) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO order_lines (id, order_id, product_id, quantity, unit_price)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&line.id)
        .bind(&line.order_id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .execute(conn)
        .await?;

        Ok(())
    }
}
