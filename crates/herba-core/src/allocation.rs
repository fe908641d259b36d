//! # Batch Allocation
//!
//! Maps a requested sale quantity onto specific stock batches using a
//! First-Expired-First-Out (FEFO) policy.
//!
//! ## FEFO Walk
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Request: 7 units of product P                                  │
//! │                                                                 │
//! │  Batches sorted by (expiry_date, id):                           │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │ B1 exp 01-01 │   │ B2 exp 06-01 │   │ B3 exp 12-01 │         │
//! │  │ qty 5        │   │ qty 5        │   │ qty 5        │         │
//! │  └──────┬───────┘   └──────┬───────┘   └──────────────┘         │
//! │         │ take 5           │ take 2         untouched           │
//! │         ▼                  ▼                                    │
//! │  Allocation: [(B1, 5), (B2, 2)]                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Allocation is all-or-nothing: if the batches cannot cover the full
//! request, nothing is allocated and the caller gets
//! `InsufficientStock` with the shortfall.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Batch;

/// One slice of an allocation plan: take `quantity` units from the
/// batch identified by `batch_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub batch_id: String,
    pub quantity: i64,
}

/// Selects which batches a sale draws from, FEFO order.
///
/// Sorting is by expiry date ascending with the batch id as tiebreak,
/// so two batches sharing an expiry date always allocate in the same
/// order. Zero-quantity batches are skipped.
///
/// ## Arguments
/// * `product_id` - product being allocated (for error context)
/// * `requested` - units to allocate, must be positive
/// * `batches` - the product's available batch rows
///
/// ## Returns
/// The `(batch, quantity)` plan covering exactly `requested` units, or
/// `InsufficientStock` if the batches cannot cover it.
pub fn allocate(product_id: &str, requested: i64, batches: &[Batch]) -> CoreResult<Vec<Allocation>> {
    if requested <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    let available: i64 = batches.iter().map(|b| b.quantity.max(0)).sum();
    if available < requested {
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available,
            requested,
        });
    }

    let mut candidates: Vec<&Batch> = batches.iter().filter(|b| b.quantity > 0).collect();
    candidates.sort_by(|a, b| {
        a.expiry_date
            .cmp(&b.expiry_date)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut plan = Vec::new();
    let mut remaining = requested;

    for batch in candidates {
        if remaining == 0 {
            break;
        }

        let take = remaining.min(batch.quantity);
        plan.push(Allocation {
            batch_id: batch.id.clone(),
            quantity: take,
        });
        remaining -= take;
    }

    debug_assert_eq!(remaining, 0);
    Ok(plan)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn batch(id: &str, expiry: (i32, u32, u32), qty: i64) -> Batch {
        let mut b = Batch::new(
            "prod-1",
            format!("LOT-{id}"),
            NaiveDate::from_ymd_opt(expiry.0, expiry.1, expiry.2).unwrap(),
            qty,
        );
        b.id = id.to_string();
        b
    }

    #[test]
    fn test_fefo_takes_oldest_expiry_first() {
        let batches = vec![
            batch("b3", (2026, 12, 1), 5),
            batch("b1", (2026, 1, 1), 5),
            batch("b2", (2026, 6, 1), 5),
        ];

        let plan = allocate("prod-1", 7, &batches).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0], Allocation { batch_id: "b1".to_string(), quantity: 5 });
        assert_eq!(plan[1], Allocation { batch_id: "b2".to_string(), quantity: 2 });
    }

    #[test]
    fn test_equal_expiry_breaks_tie_by_id() {
        let batches = vec![
            batch("b2", (2026, 6, 1), 5),
            batch("b1", (2026, 6, 1), 5),
        ];

        let plan = allocate("prod-1", 6, &batches).unwrap();

        assert_eq!(plan[0].batch_id, "b1");
        assert_eq!(plan[0].quantity, 5);
        assert_eq!(plan[1].batch_id, "b2");
        assert_eq!(plan[1].quantity, 1);
    }

    #[test]
    fn test_zero_quantity_batches_are_skipped() {
        let batches = vec![
            batch("b1", (2026, 1, 1), 0),
            batch("b2", (2026, 6, 1), 10),
        ];

        let plan = allocate("prod-1", 4, &batches).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].batch_id, "b2");
        assert_eq!(plan[0].quantity, 4);
    }

    #[test]
    fn test_exact_fit_drains_batch() {
        let batches = vec![batch("b1", (2026, 1, 1), 5)];

        let plan = allocate("prod-1", 5, &batches).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].quantity, 5);
    }

    #[test]
    fn test_insufficient_stock_allocates_nothing() {
        let batches = vec![
            batch("b1", (2026, 1, 1), 5),
            batch("b2", (2026, 6, 1), 5),
        ];

        let err = allocate("prod-1", 11, &batches).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, "prod-1");
                assert_eq!(available, 10);
                assert_eq!(requested, 11);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_no_batches_at_all() {
        let err = allocate("prod-1", 1, &[]).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 0, .. }));
    }

    #[test]
    fn test_non_positive_request_is_rejected() {
        let batches = vec![batch("b1", (2026, 1, 1), 5)];

        assert!(matches!(
            allocate("prod-1", 0, &batches).unwrap_err(),
            CoreError::Validation(_)
        ));
        assert!(matches!(
            allocate("prod-1", -3, &batches).unwrap_err(),
            CoreError::Validation(_)
        ));
    }
}
