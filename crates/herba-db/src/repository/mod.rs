//! # Repository Module
//!
//! Database repository implementations for Herba POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Caller                                                         │
//! │     │  db.batches().available_for_product("prod-1")             │
//! │     ▼                                                           │
//! │  BatchRepository                                                │
//! │     │  SQL query                                                │
//! │     ▼                                                           │
//! │  SQLite Database                                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Master-data repositories (product, price, customer) are read paths
//! for the engines plus insert tooling for seeding; the ledger never
//! mutates master data. Batch and movement WRITES are `pub(crate)`,
//! transaction-scoped functions reachable only from the ledger and
//! checkout engines.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - product lookups
//! - [`price::PriceRepository`] - per-segment price rows
//! - [`customer::CustomerRepository`] - customer/segment lookups
//! - [`batch::BatchRepository`] - batch reads + tx-scoped mutation
//! - [`movement::StockMovementRepository`] - append-only audit trail
//! - [`order::OrderRepository`] - orders and order lines

pub mod batch;
pub mod customer;
pub mod movement;
pub mod order;
pub mod price;
pub mod product;
