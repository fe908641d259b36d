//! # herba-core: Pure Business Logic for Herba POS
//!
//! Herba POS is the inventory and point-of-sale backend for a
//! single-location herbal-products retailer. Stock is batched and
//! perishable, and three customer segments (retail, pharmacy,
//! distributor) buy at different price points.
//!
//! This crate is the I/O-free heart of the system: every pricing and
//! allocation decision is made here as a pure function, then applied
//! durably by the `herba-db` ledger.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Herba POS Architecture                      │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │             Application layer (API / terminals)           │  │
//! │  └────────────────────────────┬──────────────────────────────┘  │
//! │                               │                                 │
//! │  ┌────────────────────────────▼──────────────────────────────┐  │
//! │  │              ★ herba-core (THIS CRATE) ★                  │  │
//! │  │                                                           │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌──────────────┐  │  │
//! │  │  │  types  │ │  money  │ │  pricing  │ │  allocation  │  │  │
//! │  │  │ Product │ │  Money  │ │  segment  │ │  FEFO batch  │  │  │
//! │  │  │  Batch  │ │ (rupiah)│ │  resolve  │ │   selection  │  │  │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └──────────────┘  │  │
//! │  │                                                           │  │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS       │  │
//! │  └────────────────────────────┬──────────────────────────────┘  │
//! │                               │                                 │
//! │  ┌────────────────────────────▼──────────────────────────────┐  │
//! │  │               herba-db (Ledger + Checkout)                │  │
//! │  │      SQLite transactions, repositories, batch locks       │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Batch, Order, StockMovement, ...)
//! - [`money`] - Integer rupiah arithmetic (no floating point!)
//! - [`pricing`] - Per-segment price resolution with retail fallback
//! - [`allocation`] - First-Expired-First-Out batch allocation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use herba_core::allocation::allocate;
//! use herba_core::types::Batch;
//! use chrono::NaiveDate;
//!
//! let batches = vec![
//!     Batch::new("prod-1", "B-2024-07", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 5),
//!     Batch::new("prod-1", "B-2024-11", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 5),
//! ];
//!
//! // Oldest-expiring stock is always drawn first.
//! let plan = allocate("prod-1", 8, &batches).unwrap();
//! assert_eq!(plan[0].quantity, 5);
//! assert_eq!(plan[1].quantity, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{allocate, Allocation};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::resolve_price;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single checkout cart.
///
/// Keeps one transaction from locking an unbounded batch set; large
/// wholesale orders are split at the register.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line.
///
/// Catches fat-finger entries (e.g. 1000 instead of 10) before they
/// reach allocation.
pub const MAX_ITEM_QUANTITY: i64 = 999;
