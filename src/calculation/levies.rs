//! Flat and percentage levies.
//!
//! Communal tax, housing-fund levy, broadcast levy and local development tax.
//! None of these are rounded here.

use rust_decimal::Decimal;

use crate::config::{BroadcastLevyRates, LocalDevelopmentTaxRates, PercentageLevy};
use crate::error::{EngineError, EngineResult};

/// Communal surcharge: a fixed share of income tax.
pub fn calculate_communal_tax(income_tax: Decimal, levy: &PercentageLevy) -> Decimal {
    income_tax * levy.rate
}

/// Housing-fund levy: a fixed share of base salary.
pub fn calculate_housing_fund_levy(base_salary: Decimal, levy: &PercentageLevy) -> Decimal {
    base_salary * levy.rate
}

/// Broadcast levy: the flat amount when base salary strictly exceeds the floor.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_broadcast_levy;
/// use payroll_engine::config::BroadcastLevyRates;
/// use rust_decimal::Decimal;
///
/// let rates = BroadcastLevyRates {
///     floor: Decimal::from(50_000),
///     amount: Decimal::from(750),
/// };
/// assert_eq!(calculate_broadcast_levy(Decimal::from(50_000), &rates), Decimal::ZERO);
/// assert_eq!(calculate_broadcast_levy(Decimal::from(50_001), &rates), Decimal::from(750));
/// ```
pub fn calculate_broadcast_levy(base_salary: Decimal, rates: &BroadcastLevyRates) -> Decimal {
    if base_salary > rates.floor {
        rates.amount
    } else {
        Decimal::ZERO
    }
}

/// Local development tax: the flat amount of the step containing base salary.
///
/// Step bounds are inclusive. A disabled tax is always zero.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRateTable`] if the tax is enabled and no step
/// covers `base_salary`.
pub fn calculate_local_development_tax(
    base_salary: Decimal,
    rates: &LocalDevelopmentTaxRates,
) -> EngineResult<Decimal> {
    if !rates.enabled {
        return Ok(Decimal::ZERO);
    }

    rates
        .steps
        .iter()
        .find(|step| step.up_to.is_none_or(|up_to| base_salary <= up_to))
        .map(|step| step.amount)
        .ok_or_else(|| {
            EngineError::invalid_table(format!(
                "no local development tax step covers a base salary of {}",
                base_salary.normalize()
            ))
        })
}
