//! Request types for the Payroll Engine API.
//!
//! This module defines the JSON request structures for the `/payslips`
//! endpoints. Bonuses and allowances are accepted in every shape the
//! normalizer understands and are canonicalized before reaching the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{RawCompensation, normalize_compensation};
use crate::models::{CompensationInput, OvertimeHours, PayPeriod};

/// One employee's compensation for a pay period, as submitted by a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCompensation {
    /// Identifier of the employee the payslip belongs to.
    pub employee_id: String,
    /// Contractual monthly gross before bonuses.
    pub base_salary: Decimal,
    /// Contractual hours per month.
    pub hours_per_month: Decimal,
    /// Days worked in the period.
    pub days_worked: Decimal,
    /// Overtime hours by category.
    #[serde(default)]
    pub overtime_hours: OvertimeHours,
    /// Bonus and allowance lists or legacy fixed fields.
    #[serde(flatten)]
    pub compensation: RawCompensation,
}

impl EmployeeCompensation {
    /// Normalizes the submitted record into a canonical engine input.
    pub fn to_input(&self) -> CompensationInput {
        let normalized = normalize_compensation(&self.compensation);
        CompensationInput {
            base_salary: self.base_salary,
            hours_per_month: self.hours_per_month,
            days_worked: self.days_worked,
            overtime_hours: self.overtime_hours.clone(),
            bonuses: normalized.bonuses,
            allowances: normalized.allowances,
        }
    }
}

/// Request body for the `/payslips/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipRequest {
    /// The pay period, whose start date selects the rate table.
    pub pay_period: PayPeriod,
    /// The employee's compensation.
    #[serde(flatten)]
    pub employee: EmployeeCompensation,
}

/// Request body for the `/payslips/batch` endpoint.
///
/// Every employee in a batch shares the pay period and so the rate table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The shared pay period.
    pub pay_period: PayPeriod,
    /// One entry per employee.
    pub employees: Vec<EmployeeCompensation>,
}
