//! # Money Module
//!
//! Provides the `Money` type and the rupiah formatter.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RUPIAH HAS NO MINOR UNIT IN PRACTICE                                   │
//! │                                                                         │
//! │  Prices are stored as whole rupiah in an i64:                          │
//! │    Rp 10.000  →  10000                                                 │
//! │                                                                         │
//! │  Every amount carries two forms in the database:                       │
//! │    total_price_value = 18000        (arithmetic)                       │
//! │    total_price       = "Rp 18.000"  (display, derived)                 │
//! │                                                                         │
//! │  Arithmetic is checked: an overflow is a CoreError, never a wrap.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pasar_core::money::{format_rupiah, Money};
//!
//! let price = Money::from_rupiah(9000);
//! let line_total = price.checked_mul_quantity(2).unwrap();
//! assert_eq!(line_total.rupiah(), 18000);
//! assert_eq!(format_rupiah(line_total.rupiah()).unwrap(), "Rp 18.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, FormatError};

/// Currency symbol prefixed to every formatted amount.
pub const RUPIAH_SYMBOL: &str = "Rp";

/// Thousands separator used by the Indonesian locale.
const GROUP_SEPARATOR: char = '.';

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.base_price_value ──► calculate_price ──► offer_price_value    │
/// │                                                       │                 │
/// │                                                       ▼                 │
/// │  CartItem.offer_price_value × quantity ──► CartItem.total_price_value  │
/// │                                                       │                 │
/// │                                                       ▼                 │
/// │                                  Cart.total_price_value (aggregate)    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, failing on overflow.
    pub fn checked_add(self, other: Money) -> CoreResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(CoreError::AmountOverflow { operation: "add" })
    }

    /// Subtracts `other`, failing on overflow.
    ///
    /// A negative result is allowed; only leaving the i64 range is an error.
    pub fn checked_sub(self, other: Money) -> CoreResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(CoreError::AmountOverflow {
                operation: "subtract",
            })
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use pasar_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(9000);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().rupiah(), 27000);
    /// assert!(Money::from_rupiah(i64::MAX).checked_mul_quantity(2).is_err());
    /// ```
    pub fn checked_mul_quantity(self, qty: i64) -> CoreResult<Money> {
        self.0
            .checked_mul(qty)
            .map(Money)
            .ok_or(CoreError::AmountOverflow {
                operation: "multiply",
            })
    }

    /// Formats the amount as an Indonesian rupiah display string.
    pub fn format(&self) -> Result<String, FormatError> {
        format_rupiah(self.0)
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats whole rupiah with Indonesian digit grouping and no decimals.
///
/// ## Examples
/// ```text
///   0          →  "Rp 0"
///   5000       →  "Rp 5.000"
///   1250000    →  "Rp 1.250.000"
///   -18000     →  "-Rp 18.000"
/// ```
///
/// ## Errors
/// `FormatError::AmountOutOfRange` for `i64::MIN`, whose magnitude does
/// not fit in an i64.
pub fn format_rupiah(value: i64) -> Result<String, FormatError> {
    let magnitude = value
        .checked_abs()
        .ok_or(FormatError::AmountOutOfRange(value))?;

    let digits = magnitude.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }

    let sign = if value < 0 { "-" } else { "" };
    Ok(format!("{sign}{RUPIAH_SYMBOL} {grouped}"))
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = format_rupiah(self.0).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(rupiah: i64) -> Self {
        Money(rupiah)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
