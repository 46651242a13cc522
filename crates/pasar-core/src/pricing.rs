//! # Price Calculator
//!
//! Turns a catalog base price and a percentage discount into the offer
//! price stored on the product.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  offer = base − ⌊base × discount / 100⌋     (integer, toward zero)      │
//! │                                                                         │
//! │  base 10000, discount   0  →  offer 10000                               │
//! │  base 10000, discount  10  →  offer  9000                               │
//! │  base 10000, discount 100  →  offer     0                               │
//! │  base  9999, discount  15  →  offer  8500   (1499.85 truncates to 1499) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount amount is computed in i128 so `base × discount` cannot
//! overflow; the result always fits back in i64 because it is ≤ base.

use serde::Serialize;

use crate::error::{CoreResult, ValidationError};
use crate::money::format_rupiah;
use crate::validation::Discount;

/// Result of [`calculate_price`]: both prices formatted, plus the offer
/// value for arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculatedPrice {
    pub base: String,
    pub offer: String,
    pub offer_value: i64,
}

/// Computes the offer price.
///
/// ## Errors
/// - `ValidationError::OutOfRange` for a negative base price
/// - `FormatError` if either amount cannot be formatted
///
/// ## Example
/// ```rust
/// use pasar_core::pricing::calculate_price;
/// use pasar_core::validation::Discount;
///
/// let price = calculate_price(10000, Discount::new(10).unwrap()).unwrap();
/// assert_eq!(price.offer_value, 9000);
/// assert_eq!(price.base, "Rp 10.000");
/// assert_eq!(price.offer, "Rp 9.000");
/// ```
pub fn calculate_price(base_value: i64, discount: Discount) -> CoreResult<CalculatedPrice> {
    if base_value < 0 {
        return Err(ValidationError::OutOfRange {
            field: "base_price_value".to_string(),
            min: 0,
            max: i64::MAX,
        }
        .into());
    }

    let base = format_rupiah(base_value)?;

    let offer_value = if discount.percent() == 0 {
        base_value
    } else {
        let cut = (base_value as i128 * discount.percent() as i128) / 100;
        base_value - cut as i64
    };

    let offer = format_rupiah(offer_value)?;

    Ok(CalculatedPrice {
        base,
        offer,
        offer_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn discount(pct: i64) -> Discount {
        Discount::new(pct).unwrap()
    }

    #[test]
    fn test_no_discount() {
        let price = calculate_price(10000, discount(0)).unwrap();
        assert_eq!(price.offer_value, 10000);
        assert_eq!(price.base, price.offer);
    }

    #[test]
    fn test_ten_percent() {
        let price = calculate_price(10000, discount(10)).unwrap();
        assert_eq!(price.offer_value, 9000);
        assert_eq!(price.offer, "Rp 9.000");
    }

    #[test]
    fn test_full_discount() {
        let price = calculate_price(10000, discount(100)).unwrap();
        assert_eq!(price.offer_value, 0);
        assert_eq!(price.offer, "Rp 0");
    }

    #[test]
    fn test_discount_truncates_toward_zero() {
        // 9999 × 15% = 1499.85, cut is 1499
        assert_eq!(calculate_price(9999, discount(15)).unwrap().offer_value, 8500);
        // 5001 × 33% = 1650.33, cut is 1650
        assert_eq!(calculate_price(5001, discount(33)).unwrap().offer_value, 3351);
    }

    #[test]
    fn test_large_base_does_not_overflow() {
        let price = calculate_price(i64::MAX, discount(50)).unwrap();
        assert_eq!(price.offer_value, i64::MAX - i64::MAX / 2);
    }

    #[test]
    fn test_negative_base_rejected() {
        assert!(matches!(
            calculate_price(-1, discount(0)),
            Err(CoreError::Validation(_))
        ));
    }
}
