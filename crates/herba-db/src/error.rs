//! # Ledger Error Types
//!
//! Error types for the database layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                            │
//! │                                                                 │
//! │  SQLite Error (sqlx::Error)        herba-core::CoreError        │
//! │       │                                 │                       │
//! │       └────────────┬────────────────────┘                       │
//! │                    ▼                                            │
//! │           LedgerError (this module)                             │
//! │                    │                                            │
//! │                    ▼                                            │
//! │           Caller (API layer) maps to a user-facing message      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use herba_core::CoreError;

/// Database and concurrency errors for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Business rule violation from herba-core (insufficient stock,
    /// unresolvable price, underpayment, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - A cart line references an unknown product
    /// - An adjustment targets a deleted/unknown batch id
    /// - A checkout names an unknown customer id
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Batch locks could not be acquired within the configured wait.
    ///
    /// The operation performed no writes; callers may retry it whole.
    /// Prices and allocations are recomputed fresh on retry.
    #[error("Timed out after {waited_ms}ms waiting for batch locks")]
    LockTimeout { waited_ms: u64 },

    /// Unique constraint violation (duplicate SKU etc.).
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal invariant breach or unexpected database state.
    #[error("Internal ledger error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to LedgerError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → LedgerError::NotFound
/// sqlx::Error::Database       → parse constraint kind from message
/// sqlx::Error::PoolTimedOut   → LedgerError::ConnectionFailed
/// Other                       → LedgerError::Internal
/// ```
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => LedgerError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    LedgerError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    LedgerError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    LedgerError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => {
                LedgerError::ConnectionFailed("Pool timed out".to_string())
            }

            sqlx::Error::PoolClosed => LedgerError::ConnectionFailed("Pool is closed".to_string()),

            _ => LedgerError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for LedgerError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        LedgerError::MigrationFailed(err.to_string())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passes_through_transparently() {
        let core = CoreError::InsufficientStock {
            product_id: "prod-1".to_string(),
            available: 2,
            requested: 5,
        };
        let ledger: LedgerError = core.into();
        assert_eq!(
            ledger.to_string(),
            "Insufficient stock for product prod-1: available 2, requested 5"
        );
    }

    #[test]
    fn test_lock_timeout_message() {
        let err = LedgerError::LockTimeout { waited_ms: 5000 };
        assert_eq!(
            err.to_string(),
            "Timed out after 5000ms waiting for batch locks"
        );
    }
}
