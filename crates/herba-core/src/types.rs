//! # Domain Types
//!
//! Core domain types used throughout Herba POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                            │
//! │                                                                 │
//! │  Master data (read-only to the ledger)                          │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐              │
//! │  │   Product   │  │    Price    │  │  Customer   │              │
//! │  │ id, sku,    │  │ product_id  │  │ id, name,   │              │
//! │  │ unit,       │  │ segment     │  │ segment     │              │
//! │  │ min_stock   │  │ price       │  │             │              │
//! │  └─────────────┘  └─────────────┘  └─────────────┘              │
//! │                                                                 │
//! │  Ledger state (mutated only via herba-db)                       │
//! │  ┌─────────────┐  ┌───────────────┐  ┌──────────────────┐       │
//! │  │    Batch    │  │ StockMovement │  │ Order/OrderLine  │       │
//! │  │ expiry_date │  │ delta, reason │  │ snapshot prices  │       │
//! │  │ quantity≥0  │  │ append-only   │  │ immutable        │       │
//! │  └─────────────┘  └───────────────┘  └──────────────────┘       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has an `id` (UUID v4, immutable, used for relations)
//! and, where one exists, a human business key (sku, batch_number).
//! Batch numbers are NOT unique: two receipts of the same printed lot
//! number create two batch rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Customer Segment
// =============================================================================

/// Customer pricing tier.
///
/// Every customer belongs to exactly one segment; walk-in sales with no
/// customer record are priced as retail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CustomerSegment {
    /// Walk-in / default tier.
    Retail,
    /// Pharmacy (apotek) resale tier.
    Pharmacy,
    /// Bulk distributor tier.
    Distributor,
}

impl CustomerSegment {
    /// Stable lowercase name, matching the database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CustomerSegment::Retail => "retail",
            CustomerSegment::Pharmacy => "pharmacy",
            CustomerSegment::Distributor => "distributor",
        }
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for CustomerSegment {
    fn default() -> Self {
        CustomerSegment::Retail
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How an order is settled.
///
/// Only `Cash` requires the tendered amount to cover the total at the
/// register; transfer and QRIS settlements are reconciled outside the
/// checkout path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Qris,
}

impl PaymentMethod {
    /// True when the method settles in physical cash at the register.
    pub const fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

// =============================================================================
// Movement Reason
// =============================================================================

/// Why a batch quantity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MovementReason {
    /// Goods receipt created the batch (positive delta).
    Receipt,
    /// Checkout allocation drew stock down (negative delta).
    Sale,
    /// Manual correction: damage, loss, recount (either sign).
    Adjustment,
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Paid and stock-deducted.
    Completed,
    /// Cancelled after completion. No transition API exists yet; the
    /// variant is part of the stored model.
    Voided,
}

// =============================================================================
// Product
// =============================================================================

/// A sellable product. Master data: the ledger reads it, never writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - unique business identifier.
    pub sku: String,

    /// Display name shown at the register and on receipts.
    pub name: String,

    /// Barcode (EAN-13 etc.), if the packaging carries one.
    pub barcode: Option<String>,

    /// Category reference.
    pub category_id: Option<String>,

    /// Unit-of-measure label, e.g. "botol", "box", "sachet".
    pub unit: String,

    /// Threshold under which the product counts as low-stock.
    pub min_stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Price
// =============================================================================

/// A per-segment unit price for a product. Unique per (product, segment).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Price {
    pub id: String,
    pub product_id: String,
    pub segment: CustomerSegment,
    /// Unit price in whole rupiah.
    pub price: i64,
}

impl Price {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::new(self.price)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A known customer. The ledger reads only the segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub segment: CustomerSegment,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Batch
// =============================================================================

/// A discrete lot of a product with its own expiry date and remaining
/// quantity.
///
/// ## Invariants
/// - `quantity >= 0`, always
/// - a product's total stock equals the sum over its batches
/// - rows reaching zero are retained as history, never deleted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Batch {
    pub id: String,
    pub product_id: String,
    /// Printed lot number from the supplier. Free text, not unique.
    pub batch_number: String,
    pub expiry_date: NaiveDate,
    /// Remaining units in this batch.
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    /// Creates a new batch with a fresh UUID, as a goods receipt does.
    pub fn new(
        product_id: impl Into<String>,
        batch_number: impl Into<String>,
        expiry_date: NaiveDate,
        quantity: i64,
    ) -> Self {
        let now = Utc::now();
        Batch {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            batch_number: batch_number.into(),
            expiry_date,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A completed sale. Immutable after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Absent for walk-in sales.
    pub customer_id: Option<String>,
    /// Cashier attribution, supplied by the identity provider.
    pub user_id: String,
    pub payment_method: PaymentMethod,
    /// Order total in whole rupiah.
    pub total: i64,
    /// True tendered amount, kept unclamped for audit.
    pub amount_paid: i64,
    /// Change returned, clamped at zero.
    pub change: i64,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total_money(&self) -> Money {
        Money::new(self.total)
    }

    #[inline]
    pub fn change_money(&self) -> Money {
        Money::new(self.change)
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item in an order.
///
/// `unit_price` is the price charged at sale time. It is never
/// recomputed: later edits to the price table do not reach here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Unit price snapshot in whole rupiah.
    pub unit_price: i64,
}

impl OrderLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::new(self.unit_price).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One entry in the append-only stock audit trail.
///
/// Written in the same transaction as the batch mutation it records, so
/// per-batch prefix sums of `delta` always equal the batch's current
/// quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,
    pub batch_id: String,
    /// Signed quantity change: positive receipt, negative sale.
    pub delta: i64,
    pub reason: MovementReason,
    /// The order id for sales, the batch id for receipts, absent for
    /// manual adjustments.
    pub ref_id: Option<String>,
    pub user_id: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_as_str_matches_db_representation() {
        assert_eq!(CustomerSegment::Retail.as_str(), "retail");
        assert_eq!(CustomerSegment::Pharmacy.as_str(), "pharmacy");
        assert_eq!(CustomerSegment::Distributor.as_str(), "distributor");
    }

    #[test]
    fn test_segment_default_is_retail() {
        assert_eq!(CustomerSegment::default(), CustomerSegment::Retail);
    }

    #[test]
    fn test_payment_method_cash_settlement() {
        assert!(PaymentMethod::Cash.is_cash());
        assert!(!PaymentMethod::Transfer.is_cash());
        assert!(!PaymentMethod::Qris.is_cash());
    }

    #[test]
    fn test_batch_new_generates_distinct_ids() {
        let expiry = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let a = Batch::new("prod-1", "BATCH-001", expiry, 100);
        let b = Batch::new("prod-1", "BATCH-001", expiry, 100);
        // Same printed lot number, two distinct batch rows.
        assert_ne!(a.id, b.id);
        assert_eq!(a.batch_number, b.batch_number);
    }

    #[test]
    fn test_order_line_total() {
        let line = OrderLine {
            id: "line-1".to_string(),
            order_id: "order-1".to_string(),
            product_id: "prod-1".to_string(),
            quantity: 10,
            unit_price: 75_000,
        };
        assert_eq!(line.line_total().amount(), 750_000);
    }

    #[test]
    fn test_segment_serde_roundtrip() {
        let json = serde_json::to_string(&CustomerSegment::Pharmacy).unwrap();
        assert_eq!(json, "\"pharmacy\"");
        let back: CustomerSegment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CustomerSegment::Pharmacy);
    }
}
