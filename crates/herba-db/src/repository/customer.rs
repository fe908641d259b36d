//! # Customer Repository
//!
//! Customer master data. The checkout engine reads only the segment to
//! pick the price tier; everything else is presentation data.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::LedgerResult;
use herba_core::{Customer, CustomerSegment};

/// Repository for customer lookups.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> LedgerResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address, segment, created_at
             FROM customers
             WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer (master-data/seed tooling).
    pub async fn insert(&self, customer: &Customer) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO customers (id, name, phone, address, segment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.segment)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Helper to build a customer with a fresh UUID.
pub fn new_customer(name: &str, segment: CustomerSegment) -> Customer {
    Customer {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        phone: None,
        address: None,
        segment,
        created_at: Utc::now(),
    }
}
