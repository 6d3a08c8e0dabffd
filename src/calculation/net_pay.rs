//! Gross and net pay aggregation.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::CompensationLine;

/// Gross remuneration: base salary, overtime, every bonus and every allowance.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the sum does not fit in a [`Decimal`].
pub fn calculate_gross_total(
    base_salary: Decimal,
    overtime_pay: Decimal,
    bonuses: &[CompensationLine],
    allowances: &[CompensationLine],
) -> EngineResult<Decimal> {
    base_salary
        .checked_add(overtime_pay)
        .and_then(|start| {
            bonuses
                .iter()
                .chain(allowances)
                .try_fold(start, |total, line| total.checked_add(line.amount))
        })
        .ok_or_else(|| EngineError::invalid_input("gross_total", "sum of pay components is out of range"))
}

/// Net payable amount, floored at zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_net_pay;
/// use rust_decimal::Decimal;
///
/// assert_eq!(calculate_net_pay(Decimal::from(1_000), Decimal::from(300)), Decimal::from(700));
/// assert_eq!(calculate_net_pay(Decimal::from(300), Decimal::from(1_000)), Decimal::ZERO);
/// ```
pub fn calculate_net_pay(gross_total: Decimal, deductions_total: Decimal) -> Decimal {
    (gross_total - deductions_total).max(Decimal::ZERO)
}
