//! Social-security contribution.

use rust_decimal::Decimal;

use crate::config::SocialSecurityRates;

/// Computes the capped social-security contribution.
///
/// The contribution is `min(base_salary, cap) × rate`, so salaries above the
/// cap all pay the same amount.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_social_security;
/// use payroll_engine::config::SocialSecurityRates;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rates = SocialSecurityRates {
///     rate: Decimal::from_str("0.042").unwrap(),
///     cap: Decimal::from(750_000),
/// };
/// assert_eq!(
///     calculate_social_security(Decimal::from(1_000_000), &rates),
///     Decimal::from(31_500)
/// );
/// ```
pub fn calculate_social_security(base_salary: Decimal, rates: &SocialSecurityRates) -> Decimal {
    base_salary.min(rates.cap).max(Decimal::ZERO) * rates.rate
}
