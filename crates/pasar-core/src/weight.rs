//! # Weight Module
//!
//! Gram weights are carried as `f64` with two-decimal rounding applied at
//! every step that produces a stored value.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  grams        format_weight                                             │
//! │  ─────────    ──────────────                                            │
//! │  500.0    →   "500.00gr"                                                │
//! │  999.99   →   "999.99gr"                                                │
//! │  1000.0   →   "1.00kg"      (≥ 1000 g switches to kilograms)            │
//! │  1500.0   →   "1.50kg"                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Grams per kilogram; also the threshold for kilogram display.
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// Rounds to two decimal places, halves away from zero.
///
/// ## Example
/// ```rust
/// use pasar_core::weight::round2;
///
/// assert_eq!(round2(1004.996), 1005.0);
/// assert_eq!(round2(0.125), 0.13);
/// assert_eq!(round2(-0.125), -0.13);
/// ```
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a gram weight for display.
///
/// Two fixed decimals, no locale variance. Weights of 1000 g and above are
/// shown in kilograms.
pub fn format_weight(grams: f64) -> String {
    if grams >= GRAMS_PER_KILOGRAM {
        format!("{:.2}kg", grams / GRAMS_PER_KILOGRAM)
    } else {
        format!("{:.2}gr", grams)
    }
}
