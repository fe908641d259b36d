//! # Checkout Engine
//!
//! Executes a whole cart as one atomic unit of work: price every line,
//! allocate stock FEFO across batches, verify payment, persist the
//! order, and deduct stock. All of it commits or none of it does.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  checkout(request)                                              │
//! │       │                                                         │
//! │  1. validate cart shape (non-empty, positive quantities)        │
//! │  2. resolve customer segment (no customer ⇒ retail)             │
//! │  3. per line: load product, resolve segment price               │
//! │  4. scan candidate batches, lock them (ascending id order)      │
//! │  5. re-read under lock, allocate FEFO per line                  │
//! │  6. total = Σ price × qty; cash must cover it                   │
//! │  7. BEGIN                                                       │
//! │       INSERT order + lines (snapshot prices)                    │
//! │       deduct_for_sale(allocations)                              │
//! │     COMMIT                                                      │
//! │  8. release locks, return (order id, change due)                │
//! │                                                                 │
//! │  Any failure in 1-6 returns before a single row is written.     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Locks are always acquired BEFORE the transaction begins, and a
//! transaction never waits on a batch lock, so the pool and the lock
//! manager cannot deadlock against each other.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::InventoryLedger;
use crate::locks::BatchLockManager;
use crate::repository::batch::BatchRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;
use crate::repository::price::PriceRepository;
use crate::repository::product::ProductRepository;
use herba_core::validation::{validate_amount_paid, validate_cart_size, validate_quantity};
use herba_core::{
    allocate, resolve_price, Allocation, Batch, CoreError, CustomerSegment, Money, Order,
    OrderLine, OrderStatus, PaymentMethod,
};

// =============================================================================
// Request / Response
// =============================================================================

/// One cart line. Duplicate products across lines stay independent
/// lines; they are not merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
}

/// A checkout request from the register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    /// Absent for walk-in sales (priced as retail).
    pub customer_id: Option<String>,
    pub payment_method: PaymentMethod,
    /// Tendered amount in whole rupiah.
    pub amount_paid: i64,
    pub notes: Option<String>,
    pub user_id: String,
}

/// The result of a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub total: i64,
    pub amount_paid: i64,
    /// Change due, clamped at zero.
    pub change_due: i64,
}

/// A priced, allocated cart line, ready to persist.
struct PreparedLine {
    product_id: String,
    quantity: i64,
    unit_price: Money,
    allocations: Vec<Allocation>,
}

// =============================================================================
// Engine
// =============================================================================

/// Executes cart checkouts.
///
/// Obtained from [`crate::Database::checkout`]; instances share the
/// database's pool and lock manager with the ledger, which is what
/// serializes them against receipts and adjustments on the same
/// batches.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
    locks: Arc<BatchLockManager>,
    lock_wait: Duration,
}

impl CheckoutEngine {
    pub(crate) fn new(pool: SqlitePool, locks: Arc<BatchLockManager>, lock_wait: Duration) -> Self {
        CheckoutEngine {
            pool,
            locks,
            lock_wait,
        }
    }

    /// Executes a checkout.
    ///
    /// ## Errors
    /// - `Validation` - empty cart, non-positive quantity
    /// - `NotFound` - unknown product or customer id
    /// - `PriceNotFound` - a line has no segment price and no retail
    ///   fallback
    /// - `InsufficientStock` - a line exceeds its product's available
    ///   stock (names the product)
    /// - `InsufficientPayment` - cash tendered below the total
    /// - `LockTimeout` - batch locks not acquired in time; retry the
    ///   whole checkout, prices and allocations are recomputed fresh
    ///
    /// On any error, stock and orders are untouched.
    pub async fn checkout(&self, request: CheckoutRequest) -> LedgerResult<CheckoutReceipt> {
        // ---- 1. Validate cart shape --------------------------------------
        validate_cart_size(request.items.len()).map_err(CoreError::from)?;
        for line in &request.items {
            validate_quantity(line.quantity).map_err(CoreError::from)?;
        }
        validate_amount_paid(request.amount_paid).map_err(CoreError::from)?;

        // ---- 2. Resolve customer segment ---------------------------------
        let segment = match &request.customer_id {
            Some(customer_id) => {
                let customer = CustomerRepository::new(self.pool.clone())
                    .get_by_id(customer_id)
                    .await?
                    .ok_or_else(|| LedgerError::not_found("Customer", customer_id))?;
                customer.segment
            }
            None => CustomerSegment::Retail,
        };

        debug!(segment = %segment, lines = request.items.len(), "Pricing cart");

        // ---- 3. Price every line -----------------------------------------
        let products = ProductRepository::new(self.pool.clone());
        let prices = PriceRepository::new(self.pool.clone());

        let mut priced: Vec<(String, i64, Money)> = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = products
                .get_by_id(&line.product_id)
                .await?
                .ok_or_else(|| LedgerError::not_found("Product", &line.product_id))?;

            let rows = prices.prices_for_product(&product.id).await?;
            let unit_price = resolve_price(&product.id, &rows, segment)?;
            priced.push((product.id, line.quantity, unit_price));
        }

        // ---- 4. Lock the candidate batch set -----------------------------
        let batches = BatchRepository::new(self.pool.clone());

        let product_ids: HashSet<&String> = priced.iter().map(|(id, _, _)| id).collect();
        let mut candidate_ids: Vec<String> = Vec::new();
        for product_id in &product_ids {
            for batch in batches.available_for_product(product_id).await? {
                candidate_ids.push(batch.id);
            }
        }

        let _locks = self.locks.lock_set(&candidate_ids, self.lock_wait).await?;

        // ---- 5. Re-read under lock, allocate FEFO ------------------------
        // Quantities may have moved between the scan and the lock, so
        // the allocator only ever sees rows re-read under lock.
        // Batches created after the scan are not in the locked set and
        // stay out of this checkout; a retry picks them up.
        let locked_ids: HashSet<&String> = candidate_ids.iter().collect();
        let mut working: HashMap<String, Vec<Batch>> = HashMap::new();
        for product_id in &product_ids {
            let rows = batches
                .available_for_product(product_id)
                .await?
                .into_iter()
                .filter(|b| locked_ids.contains(&b.id))
                .collect();
            working.insert((*product_id).clone(), rows);
        }

        let mut prepared: Vec<PreparedLine> = Vec::with_capacity(priced.len());
        for (product_id, quantity, unit_price) in priced {
            let batch_list = working.entry(product_id.clone()).or_default();

            // Earlier lines of the same product have already thinned
            // the working copies, so duplicate lines never double-sell
            // one batch.
            let allocations = allocate(&product_id, quantity, batch_list)?;

            for allocation in &allocations {
                if let Some(batch) = batch_list.iter_mut().find(|b| b.id == allocation.batch_id) {
                    batch.quantity -= allocation.quantity;
                }
            }

            prepared.push(PreparedLine {
                product_id,
                quantity,
                unit_price,
                allocations,
            });
        }

        // ---- 6. Totals and payment ---------------------------------------
        let total: Money = prepared
            .iter()
            .map(|l| l.unit_price.multiply_quantity(l.quantity))
            .sum();
        let paid = Money::new(request.amount_paid);

        if request.payment_method.is_cash() && !paid.covers(total) {
            return Err(CoreError::InsufficientPayment {
                total: total.amount(),
                amount_paid: paid.amount(),
            }
            .into());
        }

        let change = paid.change_from(total);

        // ---- 7. Persist atomically ---------------------------------------
        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let order = Order {
            id: order_id.clone(),
            customer_id: request.customer_id.clone(),
            user_id: request.user_id.clone(),
            payment_method: request.payment_method,
            total: total.amount(),
            amount_paid: paid.amount(),
            change: change.amount(),
            status: OrderStatus::Completed,
            notes: request.notes.clone(),
            created_at: now,
        };

        // One movement and one decrement per batch, even when several
        // lines drew from it.
        let mut merged: BTreeMap<String, i64> = BTreeMap::new();
        for line in &prepared {
            for allocation in &line.allocations {
                *merged.entry(allocation.batch_id.clone()).or_insert(0) += allocation.quantity;
            }
        }
        let deductions: Vec<Allocation> = merged
            .into_iter()
            .map(|(batch_id, quantity)| Allocation { batch_id, quantity })
            .collect();

        let mut tx = self.pool.begin().await?;

        OrderRepository::insert_order_tx(&mut tx, &order).await?;
        for line in &prepared {
            OrderRepository::insert_line_tx(
                &mut tx,
                &OrderLine {
                    id: Uuid::new_v4().to_string(),
                    order_id: order_id.clone(),
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price.amount(),
                },
            )
            .await?;
        }

        InventoryLedger::deduct_for_sale(&mut tx, &deductions, &order_id, &request.user_id)
            .await?;

        tx.commit().await?;

        info!(
            order_id = %order_id,
            total = %total,
            change = %change,
            lines = prepared.len(),
            "Checkout completed"
        );

        Ok(CheckoutReceipt {
            order_id,
            total: total.amount(),
            amount_paid: paid.amount(),
            change_due: change.amount(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ReceiveGoods;
    use crate::pool::{Database, DbConfig};
    use crate::repository::customer::new_customer;
    use crate::repository::product::new_product;
    use chrono::NaiveDate;
    use herba_core::{MovementReason, ValidationError};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Seeds the dev catalog product: Temulawak Gold, all three tiers.
    async fn seed_priced_product(db: &Database, sku: &str) -> String {
        let product = new_product(sku, &format!("Temulawak Gold {sku}"), "botol", 10);
        db.products().insert(&product).await.unwrap();
        db.prices()
            .upsert(&product.id, CustomerSegment::Retail, 75_000)
            .await
            .unwrap();
        db.prices()
            .upsert(&product.id, CustomerSegment::Pharmacy, 65_000)
            .await
            .unwrap();
        db.prices()
            .upsert(&product.id, CustomerSegment::Distributor, 55_000)
            .await
            .unwrap();
        product.id
    }

    async fn receive(db: &Database, product_id: &str, number: &str, expiry: NaiveDate, qty: i64) -> String {
        db.ledger()
            .receive_goods(ReceiveGoods {
                product_id: product_id.to_string(),
                batch_number: number.to_string(),
                expiry_date: expiry,
                quantity: qty,
                user_id: "cashier-1".to_string(),
                notes: None,
            })
            .await
            .unwrap()
            .id
    }

    fn cash_request(items: Vec<CartLine>, amount_paid: i64) -> CheckoutRequest {
        CheckoutRequest {
            items,
            customer_id: None,
            payment_method: PaymentMethod::Cash,
            amount_paid,
            notes: None,
            user_id: "cashier-1".to_string(),
        }
    }

    fn line(product_id: &str, quantity: i64) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_checkout_end_to_end_retail() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        let batch_id = receive(&db, &product_id, "BATCH-001", date(2026, 12, 31), 100).await;

        let receipt = db
            .checkout()
            .checkout(cash_request(vec![line(&product_id, 10)], 1_000_000))
            .await
            .unwrap();

        assert_eq!(receipt.total, 750_000);
        assert_eq!(receipt.change_due, 250_000);

        let batch = db.batches().get_by_id(&batch_id).await.unwrap().unwrap();
        assert_eq!(batch.quantity, 90);

        let order = db.orders().get_by_id(&receipt.order_id).await.unwrap().unwrap();
        assert_eq!(order.total, 750_000);
        assert_eq!(order.amount_paid, 1_000_000);
        assert_eq!(order.change, 250_000);
        assert_eq!(order.status, OrderStatus::Completed);

        let lines = db.orders().lines_for_order(&receipt.order_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 10);
        assert_eq!(lines[0].unit_price, 75_000);

        let movements = db.movements().list_for_ref(&receipt.order_id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].delta, -10);
        assert_eq!(movements[0].reason, MovementReason::Sale);
    }

    #[tokio::test]
    async fn test_checkout_fefo_across_batches() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        let b1 = receive(&db, &product_id, "B1", date(2025, 1, 1), 5).await;
        let b2 = receive(&db, &product_id, "B2", date(2025, 6, 1), 5).await;

        let receipt = db
            .checkout()
            .checkout(cash_request(vec![line(&product_id, 8)], 600_000))
            .await
            .unwrap();

        assert_eq!(db.batches().get_by_id(&b1).await.unwrap().unwrap().quantity, 0);
        assert_eq!(db.batches().get_by_id(&b2).await.unwrap().unwrap().quantity, 2);

        // One sale movement per batch drawn.
        let movements = db.movements().list_for_ref(&receipt.order_id).await.unwrap();
        assert_eq!(movements.len(), 2);
        let by_batch: std::collections::HashMap<_, _> = movements
            .iter()
            .map(|m| (m.batch_id.clone(), m.delta))
            .collect();
        assert_eq!(by_batch[&b1], -5);
        assert_eq!(by_batch[&b2], -3);
    }

    #[tokio::test]
    async fn test_checkout_atomicity_on_failing_line() {
        let db = test_db().await;
        let product_a = seed_priced_product(&db, "HBL-001").await;
        let product_b = seed_priced_product(&db, "HBL-002").await;
        receive(&db, &product_a, "A1", date(2026, 6, 1), 10).await;
        receive(&db, &product_b, "B1", date(2026, 6, 1), 1).await;

        let err = db
            .checkout()
            .checkout(cash_request(
                vec![line(&product_a, 2), line(&product_b, 5)],
                10_000_000,
            ))
            .await
            .unwrap_err();

        match err {
            LedgerError::Core(CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            }) => {
                assert_eq!(product_id, product_b);
                assert_eq!(available, 1);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // First line's product is completely untouched.
        assert_eq!(db.batches().total_stock(&product_a).await.unwrap(), 10);
        assert_eq!(db.batches().total_stock(&product_b).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_checkout_price_snapshot_survives_price_change() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        receive(&db, &product_id, "B1", date(2026, 6, 1), 50).await;

        let receipt = db
            .checkout()
            .checkout(cash_request(vec![line(&product_id, 2)], 150_000))
            .await
            .unwrap();

        // Reprice after the sale.
        db.prices()
            .upsert(&product_id, CustomerSegment::Retail, 90_000)
            .await
            .unwrap();

        let lines = db.orders().lines_for_order(&receipt.order_id).await.unwrap();
        assert_eq!(lines[0].unit_price, 75_000);

        let order = db.orders().get_by_id(&receipt.order_id).await.unwrap().unwrap();
        assert_eq!(order.total, 150_000);
    }

    #[tokio::test]
    async fn test_checkout_prices_by_customer_segment() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        receive(&db, &product_id, "B1", date(2026, 6, 1), 50).await;

        let pharmacy = new_customer("Apotek Sehat", CustomerSegment::Pharmacy);
        db.customers().insert(&pharmacy).await.unwrap();

        let receipt = db
            .checkout()
            .checkout(CheckoutRequest {
                items: vec![line(&product_id, 3)],
                customer_id: Some(pharmacy.id),
                payment_method: PaymentMethod::Cash,
                amount_paid: 200_000,
                notes: None,
                user_id: "cashier-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(receipt.total, 195_000);
    }

    #[tokio::test]
    async fn test_checkout_falls_back_to_retail_price() {
        let db = test_db().await;

        // Product priced for retail only.
        let product = new_product("HBL-010", "Jahe Merah", "sachet", 5);
        db.products().insert(&product).await.unwrap();
        db.prices()
            .upsert(&product.id, CustomerSegment::Retail, 20_000)
            .await
            .unwrap();
        receive(&db, &product.id, "B1", date(2026, 6, 1), 10).await;

        let distributor = new_customer("CV Sumber Waras", CustomerSegment::Distributor);
        db.customers().insert(&distributor).await.unwrap();

        let receipt = db
            .checkout()
            .checkout(CheckoutRequest {
                items: vec![line(&product.id, 2)],
                customer_id: Some(distributor.id),
                payment_method: PaymentMethod::Cash,
                amount_paid: 40_000,
                notes: None,
                user_id: "cashier-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(receipt.total, 40_000);
    }

    #[tokio::test]
    async fn test_checkout_price_not_found_without_retail_row() {
        let db = test_db().await;

        // Pharmacy-only pricing and a retail walk-in: unpriceable.
        let product = new_product("HBL-011", "Kunyit Putih", "sachet", 5);
        db.products().insert(&product).await.unwrap();
        db.prices()
            .upsert(&product.id, CustomerSegment::Pharmacy, 30_000)
            .await
            .unwrap();
        receive(&db, &product.id, "B1", date(2026, 6, 1), 10).await;

        let err = db
            .checkout()
            .checkout(cash_request(vec![line(&product.id, 1)], 100_000))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Core(CoreError::PriceNotFound { .. })
        ));
        assert_eq!(db.batches().total_stock(&product.id).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_checkout_insufficient_cash_payment() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        receive(&db, &product_id, "B1", date(2026, 6, 1), 50).await;

        let err = db
            .checkout()
            .checkout(cash_request(vec![line(&product_id, 10)], 700_000))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Core(CoreError::InsufficientPayment {
                total: 750_000,
                amount_paid: 700_000,
            })
        ));

        // Nothing deducted.
        assert_eq!(db.batches().total_stock(&product_id).await.unwrap(), 50);
    }

    #[tokio::test]
    async fn test_checkout_transfer_skips_tender_check() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        receive(&db, &product_id, "B1", date(2026, 6, 1), 50).await;

        let receipt = db
            .checkout()
            .checkout(CheckoutRequest {
                items: vec![line(&product_id, 2)],
                customer_id: None,
                payment_method: PaymentMethod::Transfer,
                amount_paid: 0,
                notes: Some("settled by bank transfer".to_string()),
                user_id: "cashier-1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(receipt.total, 150_000);
        assert_eq!(receipt.change_due, 0);
        assert_eq!(db.batches().total_stock(&product_id).await.unwrap(), 48);
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart_and_bad_quantities() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;

        let err = db
            .checkout()
            .checkout(cash_request(vec![], 100_000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::Validation(ValidationError::EmptyCart))
        ));

        let err = db
            .checkout()
            .checkout(cash_request(vec![line(&product_id, 0)], 100_000))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_checkout_unknown_customer() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        receive(&db, &product_id, "B1", date(2026, 6, 1), 10).await;

        let err = db
            .checkout()
            .checkout(CheckoutRequest {
                items: vec![line(&product_id, 1)],
                customer_id: Some("no-such-customer".to_string()),
                payment_method: PaymentMethod::Cash,
                amount_paid: 100_000,
                notes: None,
                user_id: "cashier-1".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_checkout_duplicate_lines_share_stock() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        receive(&db, &product_id, "B1", date(2026, 6, 1), 5).await;

        // 3 + 3 exceeds the 5 on hand: the second line must see what
        // the first already claimed.
        let err = db
            .checkout()
            .checkout(cash_request(
                vec![line(&product_id, 3), line(&product_id, 3)],
                1_000_000,
            ))
            .await
            .unwrap_err();

        match err {
            LedgerError::Core(CoreError::InsufficientStock { available, requested, .. }) => {
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(db.batches().total_stock(&product_id).await.unwrap(), 5);

        // 2 + 2 fits and lands as two independent order lines.
        let receipt = db
            .checkout()
            .checkout(cash_request(
                vec![line(&product_id, 2), line(&product_id, 2)],
                1_000_000,
            ))
            .await
            .unwrap();

        let lines = db.orders().lines_for_order(&receipt.order_id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(db.batches().total_stock(&product_id).await.unwrap(), 1);

        // Both lines drew from the same batch: one merged movement.
        let movements = db.movements().list_for_ref(&receipt.order_id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].delta, -4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_checkouts_never_oversell() {
        let db = test_db().await;
        let product_id = seed_priced_product(&db, "HBL-001").await;
        let batch_id = receive(&db, &product_id, "B1", date(2026, 6, 1), 5).await;

        let db_a = db.clone();
        let db_b = db.clone();
        let pid_a = product_id.clone();
        let pid_b = product_id.clone();

        let a = tokio::spawn(async move {
            db_a.checkout()
                .checkout(cash_request(vec![line(&pid_a, 3)], 1_000_000))
                .await
        });
        let b = tokio::spawn(async move {
            db_b.checkout()
                .checkout(cash_request(vec![line(&pid_b, 3)], 1_000_000))
                .await
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let stock_errors = results
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(LedgerError::Core(CoreError::InsufficientStock { .. }))
                )
            })
            .count();

        assert_eq!(successes, 1);
        assert_eq!(stock_errors, 1);

        // 5 - 3 = 2; never 5 - 6.
        let batch = db.batches().get_by_id(&batch_id).await.unwrap().unwrap();
        assert_eq!(batch.quantity, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_checkout_times_out_when_batch_stays_locked() {
        let db = Database::new(
            DbConfig::in_memory().lock_wait_timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap();
        let product_id = seed_priced_product(&db, "HBL-001").await;
        let batch_id = receive(&db, &product_id, "B1", date(2026, 6, 1), 5).await;

        // Park a competing holder on the batch lock.
        let held = db
            .lock_manager()
            .lock_one(&batch_id, Duration::from_millis(50))
            .await
            .unwrap();

        let err = db
            .checkout()
            .checkout(cash_request(vec![line(&product_id, 1)], 100_000))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::LockTimeout { .. }));
        assert_eq!(db.batches().total_stock(&product_id).await.unwrap(), 5);

        // Retry succeeds once the lock is free.
        drop(held);
        db.checkout()
            .checkout(cash_request(vec![line(&product_id, 1)], 100_000))
            .await
            .unwrap();
    }
}
