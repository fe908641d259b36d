//! # herba-db: Ledger & Checkout Engine for Herba POS
//!
//! Durable storage and the transactional engines over it. SQLite via
//! sqlx, WAL mode, embedded migrations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Herba POS Data Flow                        │
//! │                                                                 │
//! │  Caller (API layer / register terminal)                         │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                  herba-db (THIS CRATE)                    │  │
//! │  │                                                           │  │
//! │  │  ┌────────────┐ ┌──────────────┐ ┌─────────────────────┐  │  │
//! │  │  │  Database  │ │ Repositories │ │      Engines        │  │  │
//! │  │  │ (pool.rs)  │ │ product      │ │ InventoryLedger     │  │  │
//! │  │  │            │ │ price        │ │  receive_goods      │  │  │
//! │  │  │ SqlitePool │◄│ customer     │ │  adjust_stock       │  │  │
//! │  │  │ WAL mode   │ │ batch        │ │ CheckoutEngine      │  │  │
//! │  │  │ migrations │ │ movement     │ │  checkout           │  │  │
//! │  │  │ lock mgr   │ │ order        │ │                     │  │  │
//! │  │  └────────────┘ └──────────────┘ └─────────────────────┘  │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  SQLite database file (or :memory: in tests)                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration, the `Database` handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - `LedgerError` and sqlx error mapping
//! - [`locks`] - Per-batch lock manager (ordered acquisition)
//! - [`ledger`] - Goods receipt and stock adjustment
//! - [`checkout`] - Atomic cart checkout
//! - [`repository`] - Row-level repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use herba_db::{Database, DbConfig};
//! use herba_db::ledger::ReceiveGoods;
//!
//! let db = Database::new(DbConfig::new("./herba.db")).await?;
//!
//! let batch = db.ledger().receive_goods(ReceiveGoods {
//!     product_id,
//!     batch_number: "BATCH-001".into(),
//!     expiry_date,
//!     quantity: 100,
//!     user_id,
//!     notes: None,
//! }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod ledger;
pub mod locks;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CartLine, CheckoutEngine, CheckoutReceipt, CheckoutRequest};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{AdjustStock, InventoryLedger, ReceiveGoods};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::batch::BatchRepository;
pub use repository::customer::CustomerRepository;
pub use repository::movement::StockMovementRepository;
pub use repository::order::OrderRepository;
pub use repository::price::PriceRepository;
pub use repository::product::ProductRepository;
