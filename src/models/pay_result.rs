//! Pay period result models.
//!
//! This module contains the [`PayPeriodResult`] type and its associated
//! structures: derived pay rates, the [`DeductionBreakdown`], the rounded
//! [`PayslipSummary`] shown on documents, and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::round_for_display;

use super::CompensationLine;

/// Pay rates derived from base salary.
///
/// Values are unrounded; rounding is a display concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRates {
    /// Monthly rate, equal to base salary.
    pub monthly_rate: Decimal,
    /// Base salary divided by days worked.
    pub daily_rate: Decimal,
    /// Base salary divided by contractual hours per month.
    pub hourly_rate: Decimal,
}

/// Every statutory deduction for one pay period.
///
/// Levies are kept unrounded and `total` is their exact sum. Build it with
/// [`DeductionBreakdown::new`] so the total can never drift from its parts.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionBreakdown;
/// use rust_decimal::Decimal;
///
/// let breakdown = DeductionBreakdown::new(
///     Decimal::from(10_500),
///     Decimal::from(12_000),
///     Decimal::from(1_200),
///     Decimal::from(2_500),
///     Decimal::from(750),
///     Decimal::from(1_500),
/// );
/// assert_eq!(breakdown.total, Decimal::from(28_450));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Capped social-security contribution.
    pub social_security: Decimal,
    /// Progressive income tax on the net categorial salary.
    pub income_tax: Decimal,
    /// Communal surcharge on income tax.
    pub communal_tax: Decimal,
    /// Housing-fund levy on base salary.
    pub housing_fund_levy: Decimal,
    /// Flat broadcast levy.
    pub broadcast_levy: Decimal,
    /// Bracketed local development tax.
    pub local_development_tax: Decimal,
    /// Exact sum of all of the above.
    pub total: Decimal,
}

impl DeductionBreakdown {
    /// Creates a breakdown and computes its total.
    pub fn new(
        social_security: Decimal,
        income_tax: Decimal,
        communal_tax: Decimal,
        housing_fund_levy: Decimal,
        broadcast_levy: Decimal,
        local_development_tax: Decimal,
    ) -> Self {
        let total = social_security
            + income_tax
            + communal_tax
            + housing_fund_levy
            + broadcast_levy
            + local_development_tax;
        Self {
            social_security,
            income_tax,
            communal_tax,
            housing_fund_levy,
            broadcast_levy,
            local_development_tax,
            total,
        }
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The ordered audit trace for one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
}

impl AuditTrace {
    /// Appends a step, numbering it after the last one.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = next_step_number(self.steps.len());
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Finds the first step recorded for `rule_id`.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}

/// One-based number for the step after `recorded` steps, saturating at `u32::MAX`.
fn next_step_number(recorded: usize) -> u32 {
    u32::try_from(recorded)
        .ok()
        .and_then(|n| n.checked_add(1))
        .unwrap_or(u32::MAX)
}

/// The engine's single output for one employee and one pay period.
///
/// All amounts are unrounded. Use [`PayPeriodResult::summary`] for the
/// figures printed on a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodResult {
    /// Derived monthly, daily and hourly rates.
    pub rates: PayRates,
    /// Base salary the computation started from.
    pub base_salary: Decimal,
    /// Total overtime pay across all categories.
    pub overtime_pay: Decimal,
    /// Bonus lines, in input order.
    pub bonuses: Vec<CompensationLine>,
    /// Allowance lines, in input order.
    pub allowances: Vec<CompensationLine>,
    /// Base salary plus overtime plus every bonus and allowance.
    pub gross_total: Decimal,
    /// Statutory deductions.
    pub deductions: DeductionBreakdown,
    /// Gross total minus deductions, floored at zero.
    pub net_pay: Decimal,
    /// How each figure was obtained.
    pub audit_trace: AuditTrace,
}

impl PayPeriodResult {
    /// Rounds every displayed figure to `scale` decimal places.
    ///
    /// The displayed deduction total is the rounded exact total, not the sum
    /// of the rounded levies, so the two may differ by rounding residue.
    pub fn summary(&self, scale: u32) -> PayslipSummary {
        let d = &self.deductions;
        PayslipSummary {
            gross_total: round_for_display(self.gross_total, scale),
            social_security: round_for_display(d.social_security, scale),
            income_tax: round_for_display(d.income_tax, scale),
            communal_tax: round_for_display(d.communal_tax, scale),
            housing_fund_levy: round_for_display(d.housing_fund_levy, scale),
            broadcast_levy: round_for_display(d.broadcast_levy, scale),
            local_development_tax: round_for_display(d.local_development_tax, scale),
            deductions_total: round_for_display(d.total, scale),
            net_pay: round_for_display(self.net_pay, scale),
        }
    }
}

/// Rounded figures as printed on a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipSummary {
    /// Rounded gross total.
    pub gross_total: Decimal,
    /// Rounded social-security contribution.
    pub social_security: Decimal,
    /// Rounded income tax.
    pub income_tax: Decimal,
    /// Rounded communal tax.
    pub communal_tax: Decimal,
    /// Rounded housing-fund levy.
    pub housing_fund_levy: Decimal,
    /// Rounded broadcast levy.
    pub broadcast_levy: Decimal,
    /// Rounded local development tax.
    pub local_development_tax: Decimal,
    /// Rounded exact deduction total.
    pub deductions_total: Decimal,
    /// Rounded net pay.
    pub net_pay: Decimal,
}
