//! # Error Types
//!
//! Domain-specific error types for herba-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  herba-core errors (this file)                                  │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  herba-db errors (separate crate)                               │
//! │  └── LedgerError      - Database / lock failures                │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → LedgerError → caller       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant carries enough structure for the caller to name the
//! offending product, batch, or amount; no error is a bare string.

use thiserror::Error;

use crate::types::CustomerSegment;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations surfaced to the register so
/// the cashier sees the specific reason (which product lacks stock,
/// how short the payment is) rather than a generic failure.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No price row resolves for a product and segment.
    ///
    /// ## When This Occurs
    /// - The segment has no price entry AND no retail fallback exists
    /// - Master data was loaded incompletely
    #[error("No price for product {product_id} (segment {segment}, no retail fallback)")]
    PriceNotFound {
        product_id: String,
        segment: CustomerSegment,
    },

    /// Requested quantity exceeds the total available across all of a
    /// product's batches.
    ///
    /// ## When This Occurs
    /// - A cart line asks for more than the shelves hold
    /// - A concurrent sale consumed the stock first
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// A stock adjustment would drive a batch quantity negative.
    #[error("Adjustment of {delta} on batch {batch_id} rejected: quantity is {quantity}")]
    InvalidAdjustment {
        batch_id: String,
        quantity: i64,
        delta: i64,
    },

    /// Cash tendered is below the order total.
    #[error("Insufficient payment: total {total}, paid {amount_paid}")]
    InsufficientPayment { total: i64, amount_paid: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic runs; a request failing validation
/// never touches the ledger.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A checkout was submitted with no cart lines.
    #[error("Cart is empty")]
    EmptyCart,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
