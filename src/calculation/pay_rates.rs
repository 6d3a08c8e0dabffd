//! Pay rate derivation.
//!
//! This module derives the monthly, daily and hourly rates from base salary.

use rust_decimal::Decimal;

use crate::models::PayRates;

/// Derives monthly, daily and hourly rates from base salary.
///
/// A zero or negative divisor yields a zero rate rather than an error; callers
/// that actually need a rate reject such inputs during validation. No rounding
/// is applied.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_pay_rates;
/// use rust_decimal::Decimal;
///
/// let rates = calculate_pay_rates(
///     Decimal::from(240_000),
///     Decimal::from(160),
///     Decimal::from(30),
/// );
/// assert_eq!(rates.monthly_rate, Decimal::from(240_000));
/// assert_eq!(rates.daily_rate, Decimal::from(8_000));
/// assert_eq!(rates.hourly_rate, Decimal::from(1_500));
/// ```
pub fn calculate_pay_rates(
    base_salary: Decimal,
    hours_per_month: Decimal,
    days_worked: Decimal,
) -> PayRates {
    let daily_rate = if days_worked > Decimal::ZERO {
        base_salary / days_worked
    } else {
        Decimal::ZERO
    };

    let hourly_rate = if hours_per_month > Decimal::ZERO {
        base_salary / hours_per_month
    } else {
        Decimal::ZERO
    };

    PayRates {
        monthly_rate: base_salary,
        daily_rate,
        hourly_rate,
    }
}
