//! # Validation Module
//!
//! Input validation for the ledger and checkout operations. A request
//! failing here is rejected before any lock is taken or any row is
//! touched.

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale or receipt quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tendered payment amount.
///
/// Zero is allowed: transfer/QRIS orders may record the tender as zero
/// at the register and settle externally.
pub fn validate_amount_paid(amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::OutOfRange {
            field: "amount_paid".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the shape of a checkout cart.
///
/// ## Rules
/// - Must contain at least one line
/// - Must not exceed MAX_CART_ITEMS (100) lines
pub fn validate_cart_size(line_count: usize) -> ValidationResult<()> {
    if line_count == 0 {
        return Err(ValidationError::EmptyCart);
    }

    if line_count > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a supplier batch number.
///
/// Free text, not unique, but required and bounded.
pub fn validate_batch_number(batch_number: &str) -> ValidationResult<()> {
    let batch_number = batch_number.trim();

    if batch_number.is_empty() {
        return Err(ValidationError::Required {
            field: "batch_number".to_string(),
        });
    }

    if batch_number.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "batch_number".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_amount_paid() {
        assert!(validate_amount_paid(0).is_ok());
        assert!(validate_amount_paid(1_000_000).is_ok());
        assert!(validate_amount_paid(-1).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(matches!(
            validate_cart_size(0).unwrap_err(),
            ValidationError::EmptyCart
        ));
        assert!(validate_cart_size(1).is_ok());
        assert!(validate_cart_size(100).is_ok());
        assert!(validate_cart_size(101).is_err());
    }

    #[test]
    fn test_validate_batch_number() {
        assert!(validate_batch_number("BATCH-001").is_ok());
        assert!(validate_batch_number("").is_err());
        assert!(validate_batch_number("   ").is_err());
        assert!(validate_batch_number(&"B".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("product_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("product_id", "").is_err());
        assert!(validate_uuid("product_id", "not-a-uuid").is_err());
    }
}
