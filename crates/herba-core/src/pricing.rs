//! # Price Resolution
//!
//! Resolves the unit price for a product and customer segment.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  resolve_price(prices, segment)                                 │
//! │       │                                                         │
//! │       ├── price row for the exact segment? ──► use it           │
//! │       │                                                         │
//! │       ├── retail row present? ──────────────► fall back to it   │
//! │       │                                                         │
//! │       └── neither ──────────────────────────► PriceNotFound     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing retail row is a master-data integrity problem; the line
//! cannot be priced and the whole checkout fails.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CustomerSegment, Price};

/// Resolves the applicable unit price from a product's price rows.
///
/// Pure function over already-fetched rows; `prices` is expected to
/// contain only rows for `product_id`.
///
/// ## Arguments
/// * `product_id` - product being priced (for error context)
/// * `prices` - the product's price rows, one per segment at most
/// * `segment` - the buying customer's segment
pub fn resolve_price(
    product_id: &str,
    prices: &[Price],
    segment: CustomerSegment,
) -> CoreResult<Money> {
    if let Some(exact) = prices.iter().find(|p| p.segment == segment) {
        return Ok(exact.unit_price());
    }

    if let Some(retail) = prices
        .iter()
        .find(|p| p.segment == CustomerSegment::Retail)
    {
        return Ok(retail.unit_price());
    }

    Err(CoreError::PriceNotFound {
        product_id: product_id.to_string(),
        segment,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
