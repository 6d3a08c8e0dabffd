//! Statutory deduction engine.
//!
//! Every deduction is computed from base salary alone, with constants taken
//! from one [`RateTable`]. Bonuses and allowances never enter the tax base.
//!
//! Order of evaluation:
//! 1. Social security (capped)
//! 2. Net categorial salary, from base salary and social security
//! 3. Income tax on the NCS
//! 4. Communal tax on income tax
//! 5. Housing-fund levy
//! 6. Broadcast levy
//! 7. Local development tax

use rust_decimal::Decimal;
use serde_json::json;

use crate::config::RateTable;
use crate::error::EngineResult;
use crate::models::{AuditTrace, DeductionBreakdown};

use super::income_tax::{calculate_income_tax, calculate_net_categorial_salary};
use super::levies::{
    calculate_broadcast_levy, calculate_communal_tax, calculate_housing_fund_levy,
    calculate_local_development_tax,
};
use super::social_security::calculate_social_security;
use super::validation::check_amount;

/// Computes every statutory deduction for a base salary.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`](crate::error::EngineError::InvalidInput) if `base_salary` is negative or above 10^15.
/// - [`EngineError::InvalidRateTable`](crate::error::EngineError::InvalidRateTable) if the table does not cover the salary.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::calculation::compute_deductions;
/// use payroll_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/cm_general").unwrap();
/// let table = loader
///     .rate_table_for(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
///     .unwrap();
///
/// let deductions = compute_deductions(Decimal::from(250_000), table).unwrap();
/// assert_eq!(deductions.social_security, Decimal::from(10_500));
/// ```
pub fn compute_deductions(base_salary: Decimal, table: &RateTable) -> EngineResult<DeductionBreakdown> {
    compute_deductions_traced(base_salary, table, &mut AuditTrace::default())
}

/// Computes every statutory deduction and records each step in `trace`.
pub(crate) fn compute_deductions_traced(
    base_salary: Decimal,
    table: &RateTable,
    trace: &mut AuditTrace,
) -> EngineResult<DeductionBreakdown> {
    check_amount("base_salary", base_salary)?;

    let social_security = calculate_social_security(base_salary, &table.social_security);
    let capped = base_salary > table.social_security.cap;
    trace.record(
        "social_security",
        "Social Security Contribution",
        json!({
            "base_salary": base_salary.normalize().to_string(),
            "cap": table.social_security.cap.normalize().to_string(),
            "rate": table.social_security.rate.normalize().to_string()
        }),
        json!({
            "amount": social_security.normalize().to_string(),
            "cap_applied": capped
        }),
        if capped {
            format!(
                "Base salary {} exceeds cap {}: {} × {} = {}",
                base_salary.normalize(),
                table.social_security.cap.normalize(),
                table.social_security.cap.normalize(),
                table.social_security.rate.normalize(),
                social_security.normalize()
            )
        } else {
            format!(
                "{} × {} = {}",
                base_salary.normalize(),
                table.social_security.rate.normalize(),
                social_security.normalize()
            )
        },
    );

    let monthly_ncs =
        calculate_net_categorial_salary(base_salary, social_security, &table.income_tax)?;
    trace.record(
        "net_categorial_salary",
        "Net Categorial Salary",
        json!({
            "base_salary": base_salary.normalize().to_string(),
            "social_security": social_security.normalize().to_string(),
            "professional_expense_rate": table.income_tax.professional_expense_rate.normalize().to_string(),
            "annual_abatement": table.income_tax.annual_abatement.normalize().to_string()
        }),
        json!({ "monthly_ncs": monthly_ncs.normalize().to_string() }),
        format!(
            "Annualized base less {} professional expenses, social security and {} abatement, over 12 months: {}",
            table.income_tax.professional_expense_rate.normalize(),
            table.income_tax.annual_abatement.normalize(),
            monthly_ncs.normalize()
        ),
    );

    let income_tax = calculate_income_tax(monthly_ncs, &table.income_tax.brackets)?;
    trace.record(
        "income_tax",
        "Progressive Income Tax",
        json!({ "monthly_ncs": monthly_ncs.normalize().to_string() }),
        json!({ "amount": income_tax.normalize().to_string() }),
        format!(
            "Marginal brackets applied to a monthly NCS of {}: {}",
            monthly_ncs.normalize(),
            income_tax.normalize()
        ),
    );

    let communal_tax = calculate_communal_tax(income_tax, &table.communal_tax);
    trace.record(
        "communal_tax",
        "Communal Tax",
        json!({
            "income_tax": income_tax.normalize().to_string(),
            "rate": table.communal_tax.rate.normalize().to_string()
        }),
        json!({ "amount": communal_tax.normalize().to_string() }),
        format!(
            "{} × {} = {}",
            income_tax.normalize(),
            table.communal_tax.rate.normalize(),
            communal_tax.normalize()
        ),
    );

    let housing_fund_levy = calculate_housing_fund_levy(base_salary, &table.housing_fund);
    trace.record(
        "housing_fund_levy",
        "Housing Fund Levy",
        json!({
            "base_salary": base_salary.normalize().to_string(),
            "rate": table.housing_fund.rate.normalize().to_string()
        }),
        json!({ "amount": housing_fund_levy.normalize().to_string() }),
        format!(
            "{} × {} = {}",
            base_salary.normalize(),
            table.housing_fund.rate.normalize(),
            housing_fund_levy.normalize()
        ),
    );

    let broadcast_levy = calculate_broadcast_levy(base_salary, &table.broadcast_levy);
    trace.record(
        "broadcast_levy",
        "Broadcast Levy",
        json!({
            "base_salary": base_salary.normalize().to_string(),
            "floor": table.broadcast_levy.floor.normalize().to_string()
        }),
        json!({ "amount": broadcast_levy.normalize().to_string() }),
        if broadcast_levy > Decimal::ZERO {
            format!(
                "Base salary above {}: flat {}",
                table.broadcast_levy.floor.normalize(),
                broadcast_levy.normalize()
            )
        } else {
            format!(
                "Base salary does not exceed {}: waived",
                table.broadcast_levy.floor.normalize()
            )
        },
    );

    let local_development_tax =
        calculate_local_development_tax(base_salary, &table.local_development_tax)?;
    trace.record(
        "local_development_tax",
        "Local Development Tax",
        json!({
            "base_salary": base_salary.normalize().to_string(),
            "enabled": table.local_development_tax.enabled
        }),
        json!({ "amount": local_development_tax.normalize().to_string() }),
        if table.local_development_tax.enabled {
            format!(
                "Step amount for base salary {}: {}",
                base_salary.normalize(),
                local_development_tax.normalize()
            )
        } else {
            "Local development tax disabled for this jurisdiction".to_string()
        },
    );

    Ok(DeductionBreakdown::new(
        social_security,
        income_tax,
        communal_tax,
        housing_fund_levy,
        broadcast_levy,
        local_development_tax,
    ))
}
