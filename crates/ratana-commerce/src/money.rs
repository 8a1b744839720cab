//! Money type for rupee amounts.
//!
//! Uses an integer-paise representation to avoid floating-point precision
//! issues. Persisted amounts are always in paise (minor unit); in-memory
//! computation and display use rupees (major unit). This type is the single
//! conversion boundary between the two, so prices are never scaled twice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Paise per rupee.
const PAISE_PER_RUPEE: i64 = 100;

/// A rupee amount, stored as paise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    paise: i64,
}

impl Money {
    /// Create from a paise amount.
    pub fn from_paise(paise: i64) -> Self {
        Self { paise }
    }

    /// Create from a whole-rupee amount, saturating at the representable max.
    pub fn from_rupees(rupees: i64) -> Self {
        Self {
            paise: rupees.saturating_mul(PAISE_PER_RUPEE),
        }
    }

    /// Read a raw persisted value (paise) into a `Money`.
    ///
    /// This is the storage boundary: call it exactly where document fields
    /// are read, never on values that are already `Money`.
    pub fn from_storage(minor: i64) -> Self {
        Self::from_paise(minor)
    }

    /// The raw value to persist (paise).
    pub fn to_storage(self) -> i64 {
        self.paise
    }

    /// The paise amount.
    pub fn paise(self) -> i64 {
        self.paise
    }

    /// The rupee value, possibly fractional.
    pub fn rupees(self) -> f64 {
        self.paise as f64 / PAISE_PER_RUPEE as f64
    }

    /// Zero rupees.
    pub fn zero() -> Self {
        Self::from_paise(0)
    }

    /// Check if this is zero.
    pub fn is_zero(self) -> bool {
        self.paise == 0
    }

    /// Check if this is positive.
    pub fn is_positive(self) -> bool {
        self.paise > 0
    }

    /// Checked addition.
    pub fn try_add(self, other: Money) -> Option<Money> {
        self.paise.checked_add(other.paise).map(Money::from_paise)
    }

    /// Checked subtraction.
    pub fn try_subtract(self, other: Money) -> Option<Money> {
        self.paise.checked_sub(other.paise).map(Money::from_paise)
    }

    /// Checked multiplication by a scalar (e.g. a quantity).
    pub fn try_multiply(self, factor: i64) -> Option<Money> {
        self.paise.checked_mul(factor).map(Money::from_paise)
    }

    /// Checked sum of an iterator of amounts.
    pub fn try_sum(mut iter: impl Iterator<Item = Money>) -> Option<Money> {
        iter.try_fold(Money::zero(), Money::try_add)
    }

    /// Format as a display string (e.g. "₹49.99").
    pub fn display(self) -> String {
        format!("\u{20b9}{:.2}", self.rupees())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_paise(self.paise + other.paise)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_paise(self.paise - other.paise)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
