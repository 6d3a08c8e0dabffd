//! Compensation input validation.
//!
//! Validation runs before anything is computed, so a rejected input never
//! produces a partial result.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationInput, CompensationLine};

const MIN_DAYS_WORKED: Decimal = Decimal::from_parts(1, 0, 0, false, 0);
const MAX_DAYS_WORKED: Decimal = Decimal::from_parts(31, 0, 0, false, 0);

/// Largest accepted monetary amount, 10^15 in the currency's major unit.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

const MIN_HOURS_PER_MONTH: Decimal = Decimal::ONE;
/// Hours in a 31-day month.
const MAX_HOURS: Decimal = Decimal::from_parts(744, 0, 0, false, 0);

/// Checks a compensation input against the engine's preconditions.
///
/// Rejects:
/// - a negative base salary, or one above 10^15;
/// - `days_worked` outside `[1, 31]`;
/// - a nonzero `hours_per_month` outside `[1, 744]`, or a zero one when
///   overtime needs an hourly rate;
/// - any overtime hour count outside `[0, 744]`;
/// - any bonus or allowance amount outside `[0, 10^15]`.
pub fn validate_input(input: &CompensationInput) -> EngineResult<()> {
    check_amount("base_salary", input.base_salary)?;

    if input.days_worked < MIN_DAYS_WORKED || input.days_worked > MAX_DAYS_WORKED {
        return Err(EngineError::invalid_input(
            "days_worked",
            format!("must be between 1 and 31, got {}", input.days_worked),
        ));
    }

    if input.hours_per_month < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "hours_per_month",
            format!("must not be negative, got {}", input.hours_per_month),
        ));
    }
    if !input.hours_per_month.is_zero()
        && (input.hours_per_month < MIN_HOURS_PER_MONTH || input.hours_per_month > MAX_HOURS)
    {
        return Err(EngineError::invalid_input(
            "hours_per_month",
            format!("must be zero or between 1 and 744, got {}", input.hours_per_month),
        ));
    }

    let hours = &input.overtime_hours;
    for (field, value) in [
        ("overtime_hours.regular", hours.regular),
        ("overtime_hours.rest_day", hours.rest_day),
        ("overtime_hours.night", hours.night),
    ] {
        if value < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                field,
                format!("must not be negative, got {}", value),
            ));
        }
        if value > MAX_HOURS {
            return Err(EngineError::invalid_input(
                field,
                format!("must not exceed 744, got {}", value),
            ));
        }
    }

    if input.hours_per_month.is_zero() && !hours.is_zero() {
        return Err(EngineError::invalid_input(
            "hours_per_month",
            "must be positive when overtime hours are paid",
        ));
    }

    check_lines("bonuses", &input.bonuses)?;
    check_lines("allowances", &input.allowances)?;

    Ok(())
}

/// Rejects a negative amount or one above [`MAX_AMOUNT`].
pub(crate) fn check_amount(field: &str, amount: Decimal) -> EngineResult<()> {
    if amount < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", amount),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::invalid_input(
            field,
            format!("must not exceed {}, got {}", MAX_AMOUNT, amount),
        ));
    }
    Ok(())
}

fn check_lines(field: &str, lines: &[CompensationLine]) -> EngineResult<()> {
    for (index, line) in lines.iter().enumerate() {
        check_amount(&format!("{}[{}].amount", field, index), line.amount)?;
    }
    Ok(())
}
