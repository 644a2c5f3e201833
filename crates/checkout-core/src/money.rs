//! # Money Module
//!
//! Renders exact decimal amounts as pounds and pence.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Prices ("0.65") and offer fractions ("0.75") arrive as decimal         │
//! │  strings and are multiplied together. Every intermediate value stays   │
//! │  an exact `Decimal`; rounding happens exactly once, at display time.   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Display Rules
//! ```text
//!   amount        quantized    rendered
//!   ──────        ─────────    ────────
//!   1             1.00         £1.00
//!   1.235         1.24         £1.24    (tie → even digit 4)
//!   1.225         1.22         £1.22    (tie → even digit 2)
//!   0.234         0.23         23p      (no symbol below one pound)
//!   0.05          0.05         5p
//!   -2.5          -2.50        -£2.50
//!   0             0.00         0p
//! ```
//!
//! ## Usage
//! ```rust
//! use checkout_core::money::{format_gbp, Gbp};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let price = Decimal::from_str("1.235").unwrap();
//! assert_eq!(format_gbp(price), "£1.24");
//! assert_eq!(Gbp(Decimal::from_str("0.2").unwrap()).to_string(), "20p");
//! ```

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

// =============================================================================
// Constants
// =============================================================================

/// Number of decimal places in the smallest denomination (one penny).
pub const GBP_DECIMAL_PLACES: u32 = 2;

/// Pence in one pound.
const PENCE_PER_POUND: u128 = 100;

// =============================================================================
// Quantization
// =============================================================================

/// Rounds an amount to whole pence using Bankers Rounding.
///
/// ## Bankers Rounding (Round Half to Even)
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────┐
/// │  Standard rounding always rounds .5 UP, which biases totals upward. │
/// │  Round half to even sends a tie to the nearest EVEN digit:          │
/// │    1.225 → 1.22    1.235 → 1.24    0.245 → 0.24    0.255 → 0.26     │
/// └─────────────────────────────────────────────────────────────────────┘
/// ```
///
/// The result carries two decimal places, so `1` becomes `1.00` and
/// quantizing twice is a no-op. Amounts beyond `Decimal::MAX / 100` have no
/// room for them and keep a smaller scale.
pub fn quantize(amount: Decimal) -> Decimal {
    let mut quantized =
        amount.round_dp_with_strategy(GBP_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
    quantized.rescale(GBP_DECIMAL_PLACES);
    quantized
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats an amount as GBP: `£1.23` from one pound upwards, `23p` below.
///
/// Negative amounts carry a leading `-` (`-£2.50`, `-25p`). An amount that
/// rounds to zero pence is always `0p`, never `-0p`.
///
/// ## Example
/// ```rust
/// use checkout_core::money::format_gbp;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_gbp(Decimal::new(120, 2)), "£1.20");
/// assert_eq!(format_gbp(Decimal::new(-25, 2)), "-25p");
/// assert_eq!(format_gbp(Decimal::ZERO), "0p");
/// ```
pub fn format_gbp(amount: Decimal) -> String {
    let quantized = quantize(amount);
    if quantized.is_zero() {
        return "0p".to_string();
    }

    // Scale is at most 2; widen the mantissa to pence
    let to_pence = 10u128.pow(GBP_DECIMAL_PLACES - quantized.scale());
    let total_pence = quantized.mantissa().unsigned_abs() * to_pence;
    let pounds = total_pence / PENCE_PER_POUND;
    let pence = total_pence % PENCE_PER_POUND;
    let sign = if quantized.is_sign_negative() { "-" } else { "" };

    if pounds == 0 {
        format!("{sign}{pence}p")
    } else {
        format!("{sign}£{pounds}.{pence:02}")
    }
}

/// Display wrapper that renders a decimal amount via [`format_gbp`].
///
/// Handy inside `format!` and tracing fields:
/// `info!(total = %Gbp(total), "Basket priced")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gbp(pub Decimal);

impl fmt::Display for Gbp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_gbp(self.0))
    }
}

// =============================================================================
// Percentages
// =============================================================================

/// Whole-number percentage taken off by a surcharge fraction.
///
/// `fraction_of_price` is the share of the price the customer still pays, so
/// `0.75` takes 25% off. Ties round to even, like currency. Saturates at the
/// `Decimal` bounds.
pub fn percent_off(fraction_of_price: Decimal) -> Decimal {
    Decimal::ONE
        .saturating_sub(fraction_of_price)
        .saturating_mul(Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_pounds() {
        assert_eq!(format_gbp(dec!(1)), "£1.00");
        assert_eq!(format_gbp(dec!(1.2)), "£1.20");
        assert_eq!(format_gbp(dec!(1.23)), "£1.23");
        assert_eq!(format_gbp(dec!(1.234)), "£1.23");
        assert_eq!(format_gbp(dec!(1234.5)), "£1234.50");
    }

    #[test]
    fn test_format_pence() {
        assert_eq!(format_gbp(dec!(0.2)), "20p");
        assert_eq!(format_gbp(dec!(0.23)), "23p");
        assert_eq!(format_gbp(dec!(0.234)), "23p");
        assert_eq!(format_gbp(dec!(0.05)), "5p");
        assert_eq!(format_gbp(dec!(0)), "0p");
    }

    #[test]
    fn test_format_bankers_rounding() {
        assert_eq!(format_gbp(dec!(1.235)), "£1.24");
        assert_eq!(format_gbp(dec!(1.225)), "£1.22");
        assert_eq!(format_gbp(dec!(0.235)), "24p");
        assert_eq!(format_gbp(dec!(0.245)), "24p");
        // 0.995 ties to 1.00 and crosses into pounds
        assert_eq!(format_gbp(dec!(0.995)), "£1.00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_gbp(dec!(-2.5)), "-£2.50");
        assert_eq!(format_gbp(dec!(-0.25)), "-25p");
        assert_eq!(format_gbp(dec!(-1.225)), "-£1.22");
    }

    #[test]
    fn test_format_rounds_to_unsigned_zero() {
        assert_eq!(format_gbp(dec!(-0.001)), "0p");
        assert_eq!(format_gbp(dec!(0.004)), "0p");
    }

    #[test]
    fn test_quantize_is_idempotent() {
        for amount in [dec!(1.235), dec!(0.234), dec!(-7.125), dec!(42)] {
            let once = quantize(amount);
            assert_eq!(once.scale(), GBP_DECIMAL_PLACES);
            assert_eq!(quantize(once), once);
            assert_eq!(format_gbp(once), format_gbp(amount));
        }
    }

    #[test]
    fn test_format_near_decimal_bounds() {
        assert_eq!(
            format_gbp(Decimal::MAX),
            "£79228162514264337593543950335.00"
        );
        assert_eq!(
            format_gbp(Decimal::MIN),
            "-£79228162514264337593543950335.00"
        );
        assert_eq!(
            format_gbp(Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, 2)),
            "£792281625142643375935439503.35"
        );
    }

    #[test]
    fn test_gbp_display() {
        assert_eq!(format!("{}", Gbp(dec!(3.5))), "£3.50");
        assert_eq!(format!("Total: {}", Gbp(dec!(0.99))), "Total: 99p");
    }

    #[test]
    fn test_percent_off() {
        assert_eq!(percent_off(dec!(0.75)).to_string(), "25");
        assert_eq!(percent_off(dec!(0.5)).to_string(), "50");
        assert_eq!(percent_off(dec!(0.9)).to_string(), "10");
        assert_eq!(percent_off(dec!(0)).to_string(), "100");
        assert_eq!(percent_off(dec!(1)).to_string(), "0");
        // 33.5% ties to 34, 32.5% ties to 32
        assert_eq!(percent_off(dec!(0.665)).to_string(), "34");
        assert_eq!(percent_off(dec!(0.675)).to_string(), "32");
        assert_eq!(percent_off(Decimal::MIN), Decimal::MAX);
    }
}
