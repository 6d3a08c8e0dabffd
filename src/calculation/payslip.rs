//! Pay period computation.
//!
//! Ties the calculation steps together for one employee and one pay period:
//! validate, derive rates, price overtime, aggregate gross, deduct, then net.
//! The computation is pure. The same input and rate table always produce the
//! same [`PayPeriodResult`].

use rust_decimal::Decimal;
use serde_json::json;

use crate::config::RateTable;
use crate::error::EngineResult;
use crate::models::{AuditTrace, CompensationInput, PayPeriodResult};

use super::deductions::compute_deductions_traced;
use super::net_pay::{calculate_gross_total, calculate_net_pay};
use super::overtime::calculate_overtime_pay;
use super::pay_rates::calculate_pay_rates;
use super::validation::validate_input;

/// Computes the full pay period result for one employee.
///
/// # Errors
///
/// - [`crate::error::EngineError::InvalidInput`] if the input fails validation.
/// - [`crate::error::EngineError::InvalidRateTable`] if the table cannot price
///   the input (uncovered brackets, steps or overtime tiers).
///
/// # Example
///
/// ```no_run
/// use payroll_engine::calculation::compute_pay_period;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{CompensationInput, CompensationLine, OvertimeHours};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/cm_general").unwrap();
/// let table = loader
///     .rate_table_for(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
///     .unwrap();
///
/// let input = CompensationInput {
///     base_salary: Decimal::from(250_000),
///     hours_per_month: Decimal::from(173),
///     days_worked: Decimal::from(30),
///     overtime_hours: OvertimeHours::default(),
///     bonuses: vec![CompensationLine::new("Performance bonus", Decimal::from(33_000))],
///     allowances: vec![],
/// };
///
/// let result = compute_pay_period(&input, table).unwrap();
/// assert_eq!(result.gross_total, Decimal::from(283_000));
/// ```
pub fn compute_pay_period(input: &CompensationInput, table: &RateTable) -> EngineResult<PayPeriodResult> {
    validate_input(input)?;

    let mut trace = AuditTrace::default();

    let rates = calculate_pay_rates(input.base_salary, input.hours_per_month, input.days_worked);
    trace.record(
        "pay_rates",
        "Pay Rates",
        json!({
            "base_salary": input.base_salary.normalize().to_string(),
            "hours_per_month": input.hours_per_month.normalize().to_string(),
            "days_worked": input.days_worked.normalize().to_string()
        }),
        json!({
            "monthly_rate": rates.monthly_rate.normalize().to_string(),
            "daily_rate": rates.daily_rate.normalize().to_string(),
            "hourly_rate": rates.hourly_rate.normalize().to_string()
        }),
        format!(
            "Daily rate over {} days, hourly rate over {} hours",
            input.days_worked.normalize(),
            input.hours_per_month.normalize()
        ),
    );

    let overtime = calculate_overtime_pay(rates.hourly_rate, &input.overtime_hours, &table.overtime)?;
    trace.record(
        "overtime",
        "Overtime Pay",
        json!({
            "hourly_rate": rates.hourly_rate.normalize().to_string(),
            "regular_hours": input.overtime_hours.regular.normalize().to_string(),
            "rest_day_hours": input.overtime_hours.rest_day.normalize().to_string(),
            "night_hours": input.overtime_hours.night.normalize().to_string()
        }),
        json!({
            "lines": overtime.lines,
            "total": overtime.total.normalize().to_string()
        }),
        if overtime.lines.is_empty() {
            "No overtime worked".to_string()
        } else {
            let parts: Vec<String> = overtime
                .lines
                .iter()
                .map(|l| format!("{}h × {}", l.hours.normalize(), l.multiplier.normalize()))
                .collect();
            format!(
                "{} at hourly rate {} = {}",
                parts.join(" + "),
                rates.hourly_rate.normalize(),
                overtime.total.normalize()
            )
        },
    );

    let gross_total = calculate_gross_total(
        input.base_salary,
        overtime.total,
        &input.bonuses,
        &input.allowances,
    )?;
    trace.record(
        "gross_total",
        "Gross Total",
        json!({
            "base_salary": input.base_salary.normalize().to_string(),
            "overtime_pay": overtime.total.normalize().to_string(),
            "bonuses_total": input.bonuses_total().normalize().to_string(),
            "allowances_total": input.allowances_total().normalize().to_string()
        }),
        json!({ "gross_total": gross_total.normalize().to_string() }),
        format!(
            "{} base + {} overtime + {} bonuses + {} allowances = {}",
            input.base_salary.normalize(),
            overtime.total.normalize(),
            input.bonuses_total().normalize(),
            input.allowances_total().normalize(),
            gross_total.normalize()
        ),
    );

    let deductions = compute_deductions_traced(input.base_salary, table, &mut trace)?;

    let net_pay = calculate_net_pay(gross_total, deductions.total);
    trace.record(
        "net_pay",
        "Net Pay",
        json!({
            "gross_total": gross_total.normalize().to_string(),
            "deductions_total": deductions.total.normalize().to_string()
        }),
        json!({ "net_pay": net_pay.normalize().to_string() }),
        if gross_total < deductions.total {
            format!(
                "Deductions {} exceed gross {}: net pay floored at 0",
                deductions.total.normalize(),
                gross_total.normalize()
            )
        } else {
            format!(
                "{} − {} = {}",
                gross_total.normalize(),
                deductions.total.normalize(),
                net_pay.normalize()
            )
        },
    );

    Ok(PayPeriodResult {
        rates,
        base_salary: input.base_salary,
        overtime_pay: overtime.total,
        bonuses: input.bonuses.clone(),
        allowances: input.allowances.clone(),
        gross_total,
        deductions,
        net_pay,
        audit_trace: trace,
    })
}

/// Computes many pay periods against one rate table.
///
/// Each input is computed independently: one failure never affects the
/// others, and results come back in input order.
pub fn compute_batch(
    inputs: &[CompensationInput],
    table: &RateTable,
) -> Vec<EngineResult<PayPeriodResult>> {
    inputs
        .iter()
        .map(|input| compute_pay_period(input, table))
        .collect()
}

/// Sum of net pay across the successful results of a batch.
pub fn batch_net_total(results: &[EngineResult<PayPeriodResult>]) -> Decimal {
    results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|r| r.net_pay)
        .sum()
}
