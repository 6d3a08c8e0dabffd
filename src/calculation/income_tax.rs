//! Progressive income tax on the net categorial salary.
//!
//! ## Net categorial salary (NCS)
//!
//! The NCS is only ever used to look up the tax brackets. It is computed on an
//! annual basis and brought back to a monthly figure:
//!
//! ```text
//! annual NCS  = 12·base − 12·base·professional_expense_rate − 12·social_security − annual_abatement
//! monthly NCS = max(0, annual NCS) / 12
//! ```
//!
//! ## Brackets
//!
//! Each bracket taxes only the slice of NCS inside it, and the tax due at a
//! bracket's lower bound is carried forward from the brackets below. The top
//! rate is never applied to the whole amount.

use rust_decimal::Decimal;

use crate::config::{IncomeTaxRates, TaxBracket};
use crate::error::{EngineError, EngineResult};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Computes the monthly net categorial salary.
///
/// The result is never negative: a large abatement relative to salary simply
/// yields zero.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the annualized amounts do not fit
/// in a [`Decimal`].
pub fn calculate_net_categorial_salary(
    base_salary: Decimal,
    social_security: Decimal,
    rates: &IncomeTaxRates,
) -> EngineResult<Decimal> {
    let overflow = || EngineError::invalid_input("base_salary", "too large to annualize");

    let annual_gross = base_salary.checked_mul(MONTHS_PER_YEAR).ok_or_else(overflow)?;
    let annual_expenses = annual_gross
        .checked_mul(rates.professional_expense_rate)
        .ok_or_else(overflow)?;
    let annual_social_security = social_security
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(overflow)?;
    let annual_ncs = annual_gross
        .checked_sub(annual_expenses)
        .and_then(|v| v.checked_sub(annual_social_security))
        .and_then(|v| v.checked_sub(rates.annual_abatement))
        .ok_or_else(overflow)?;

    Ok(annual_ncs.max(Decimal::ZERO) / MONTHS_PER_YEAR)
}

/// Applies marginal brackets to a monthly NCS.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRateTable`] if no bracket covers
/// `monthly_ncs`, which happens only with a table whose top bracket is
/// bounded. An uncovered amount is never taxed at a default rate.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_income_tax;
/// use payroll_engine::config::TaxBracket;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let brackets = vec![
///     TaxBracket { up_to: Some(dec("166667")), rate: dec("0.10") },
///     TaxBracket { up_to: Some(dec("250000")), rate: dec("0.15") },
///     TaxBracket { up_to: Some(dec("416667")), rate: dec("0.25") },
///     TaxBracket { up_to: None, rate: dec("0.35") },
/// ];
///
/// // 16,666.70 carried from the first bracket, plus 15% of the slice above 166,667
/// let tax = calculate_income_tax(dec("200000"), &brackets).unwrap();
/// assert_eq!(tax, dec("21666.65"));
/// ```
pub fn calculate_income_tax(monthly_ncs: Decimal, brackets: &[TaxBracket]) -> EngineResult<Decimal> {
    if monthly_ncs <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;

    for bracket in brackets {
        match bracket.up_to {
            Some(upper) if monthly_ncs > upper => {
                // Whole bracket is filled; carry its tax into the next one.
                tax += (upper - lower) * bracket.rate;
                lower = upper;
            }
            _ => {
                tax += (monthly_ncs - lower) * bracket.rate;
                return Ok(tax);
            }
        }
    }

    Err(EngineError::invalid_table(format!(
        "no income tax bracket covers a monthly NCS of {}",
        monthly_ncs.normalize()
    )))
}
