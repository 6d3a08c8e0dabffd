//! Display rounding.
//!
//! The engine never rounds intermediate levies. Rounding happens once, when a
//! figure is prepared for a payslip.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to `scale` decimal places, halves away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_for_display;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("1523.34").unwrap();
/// assert_eq!(round_for_display(amount, 0), Decimal::from(1523));
///
/// let half = Decimal::from_str("362.5").unwrap();
/// assert_eq!(round_for_display(half, 0), Decimal::from(363));
/// ```
pub fn round_for_display(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(round_for_display(dec("0.5"), 0), dec("1"));
        assert_eq!(round_for_display(dec("2.5"), 0), dec("3"));
        assert_eq!(round_for_display(dec("2.49"), 0), dec("2"));
    }

    #[test]
    fn test_rounds_to_requested_scale() {
        assert_eq!(round_for_display(dec("12283.333333"), 2), dec("12283.33"));
        assert_eq!(round_for_display(dec("0.125"), 2), dec("0.13"));
    }

    #[test]
    fn test_already_rounded_amount_is_unchanged() {
        assert_eq!(round_for_display(dec("750"), 0), dec("750"));
    }
}
