//! # Money Module
//!
//! Provides the `Eur` type for monetary amounts inside the pricing engine.
//!
//! ## Why a float-backed amount?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE SPREADSHEET PARITY PROBLEM                                     │
//! │                                                                     │
//! │  Every rate in the catalog is fractional:                          │
//! │    price/kg = 1.35, rate/m² = 0.42, roulage = 10.5 per 1000        │
//! │                                                                    │
//! │  Surcharges stack multiplicatively:                                │
//! │    base × 1.20 × 1.05  (paper < 70g, one insert)                   │
//! │                                                                    │
//! │  The engine must agree with the legacy spreadsheet model, which    │
//! │  carries full float precision through every intermediate value    │
//! │  and only rounds the totals shown to the customer.                 │
//! │                                                                    │
//! │  OUR RULE: Eur wraps f64, rounding happens exactly once — in      │
//! │  `rounded()` when a component is placed into a breakdown.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pressquote_core::money::Eur;
//!
//! let calage = Eur::new(6.0) * 8.0;       // 8 plates at 6.00 each
//! let total = calage + Eur::new(88.0);
//! assert_eq!(total.rounded().amount(), 136.00);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Eur Type
// =============================================================================

/// A monetary amount in euros (the fixed quote currency).
///
/// ## Design Decisions
/// - **f64 backing**: full precision through intermediate formulas, matching
///   the legacy spreadsheet; rounding is explicit and happens once
/// - **Single field tuple struct**: zero-cost abstraction over f64
/// - **Derives**: full serde support for result serialization
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Eur(f64);

impl Eur {
    /// Creates an amount from a euro value.
    #[inline]
    pub const fn new(amount: f64) -> Self {
        Eur(amount)
    }

    /// Returns the raw (unrounded) euro amount.
    #[inline]
    pub const fn amount(&self) -> f64 {
        self.0
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Eur(0.0)
    }

    /// Checks if the amount is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Rounds to the cent (half away from zero).
    ///
    /// Called exactly once per cost component, when it is placed into a
    /// breakdown. Intermediate math stays unrounded.
    pub fn rounded(&self) -> Eur {
        Eur((self.0 * 100.0).round() / 100.0)
    }

    /// Applies a percentage rate (0.25 = 25%) and returns the derived amount.
    ///
    /// ## Example
    /// ```rust
    /// use pressquote_core::money::Eur;
    ///
    /// let subtotal = Eur::new(200.0);
    /// assert_eq!(subtotal.percent(0.25).amount(), 50.0);
    /// ```
    #[inline]
    pub fn percent(&self, rate: f64) -> Eur {
        Eur(self.0 * rate)
    }

    /// Returns the larger of two amounts.
    ///
    /// Used for minimum-billing rules (lamination, delivery floors).
    #[inline]
    pub fn max(self, other: Eur) -> Eur {
        if self.0 >= other.0 { self } else { other }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows the rounded amount for diagnostics.
impl fmt::Display for Eur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} EUR", self.0)
    }
}

impl Default for Eur {
    fn default() -> Self {
        Eur::zero()
    }
}

impl Add for Eur {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Eur(self.0 + other.0)
    }
}

impl AddAssign for Eur {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Eur {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Eur(self.0 - other.0)
    }
}

/// Multiplication by a scalar (quantities, rates, waste factors).
impl Mul<f64> for Eur {
    type Output = Self;

    #[inline]
    fn mul(self, factor: f64) -> Self {
        Eur(self.0 * factor)
    }
}

impl Sum for Eur {
    fn sum<I: Iterator<Item = Eur>>(iter: I) -> Eur {
        iter.fold(Eur::zero(), |acc, e| acc + e)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
