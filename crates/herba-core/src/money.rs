//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All amounts are whole rupiah carried in an `i64`. The rupiah has no
//! minor unit in practice, so one integer step is one rupiah; there is
//! no floating point anywhere in the money path. The database, the
//! checkout math, and the API all use the same integer representation,
//! and only display code formats it.
//!
//! ## Usage
//! ```rust
//! use herba_core::money::Money;
//!
//! let price = Money::new(75_000);
//! let line_total = price.multiply_quantity(10);
//! assert_eq!(line_total.amount(), 750_000);
//!
//! let change = Money::new(1_000_000).change_from(line_total);
//! assert_eq!(change.amount(), 250_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values appear in change math and audit
///   deltas, never in stored prices
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde transparent**: serializes as a plain number
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the amount in whole rupiah.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Zero rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use herba_core::money::Money;
    ///
    /// let unit_price = Money::new(65_000);
    /// assert_eq!(unit_price.multiply_quantity(3).amount(), 195_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Change due when `self` is tendered against `total`, clamped to
    /// zero.
    ///
    /// The clamp is for what the register displays and stores in the
    /// order's change column; the true tendered amount is kept
    /// separately for audit.
    ///
    /// ## Example
    /// ```rust
    /// use herba_core::money::Money;
    ///
    /// let paid = Money::new(100_000);
    /// assert_eq!(paid.change_from(Money::new(80_000)).amount(), 20_000);
    /// assert_eq!(paid.change_from(Money::new(120_000)).amount(), 0);
    /// ```
    #[inline]
    pub const fn change_from(&self, total: Money) -> Self {
        let diff = self.0 - total.0;
        if diff > 0 {
            Money(diff)
        } else {
            Money(0)
        }
    }

    /// Checks whether this tendered amount covers `total`.
    #[inline]
    pub const fn covers(&self, total: Money) -> bool {
        self.0 >= total.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display formats rupiah with dot thousands separators, e.g. `Rp75.000`.
///
/// Intended for logs and receipts in tests; localized display belongs
/// to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        write!(f, "{}Rp{}", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
