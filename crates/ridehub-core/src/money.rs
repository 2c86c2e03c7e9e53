//! # Money Module
//!
//! Provides the `Money` type for rental prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prices are listed per day in pesos, e.g. ₱499.50/day.                  │
//! │                                                                         │
//! │  As floats:     499.5 × 3 = 1498.5 (fine) ... until it isn't            │
//! │  As centavos:   49950 × 3 = 149850 (always exact)                       │
//! │                                                                         │
//! │  Every stored price and every booking total is an i64 of centavos.     │
//! │  Only Display converts to a human-readable peso amount.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ridehub_core::money::Money;
//!
//! let per_day = Money::from_major(500);       // ₱500.00
//! let total = per_day.multiply_days(3).unwrap(); // ₱1500.00
//! assert_eq!(total.centavos(), 150_000);
//! assert_eq!(total.to_string(), "₱1500.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a peso).
///
/// Serialized as the bare integer so documents stay compact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Creates a Money value from whole pesos, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use ridehub_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(500).centavos(), 50_000);
    /// ```
    #[inline]
    pub const fn from_major(pesos: i64) -> Self {
        Money(pesos.saturating_mul(100))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero pesos.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies a per-day price by a number of rental days.
    ///
    /// ## User Workflow
    /// ```text
    /// Vehicle: Honda Click 125, ₱500/day
    /// Dates:   Jan 1 → Jan 3 (3 days, inclusive)
    ///      │
    ///      ▼
    /// multiply_days(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Booking total: ₱1500.00
    /// ```
    ///
    /// Returns `None` when the total does not fit in an i64 of centavos.
    #[inline]
    pub const fn multiply_days(&self, days: u32) -> Option<Self> {
        match self.0.checked_mul(days as i64) {
            Some(total) => Some(Money(total)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows pesos with two decimals, e.g. `₱1500.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₱{}.{:02}",
            sign,
            self.major().abs(),
            self.minor_part()
        )
    }
}

/// Parses a peso amount as typed into a filter or price field.
///
/// Accepts `"500"`, `"499.5"`, `"499.50"`. At most two decimal places.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ValidationError::invalid_format("amount", format!("'{}' is not a peso amount", s));

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let pesos: i64 = whole.parse().map_err(|_| invalid())?;
        let centavos: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        pesos
            .checked_mul(100)
            .and_then(|c| c.checked_add(centavos))
            .map(Money)
            .ok_or_else(invalid)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

// =============================================================================
// Unit Tests
// =============================================================================
