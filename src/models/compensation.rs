//! Compensation input models.
//!
//! This module defines the [`CompensationInput`] record for one employee and one
//! pay period, together with its canonical bonus/allowance lines and overtime
//! hours.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single labelled bonus or allowance amount.
///
/// Bonuses and allowances share this canonical shape. Their order is kept for
/// display but never affects totals.
///
/// # Example
///
/// ```
/// use payroll_engine::models::CompensationLine;
/// use rust_decimal::Decimal;
///
/// let line = CompensationLine::new("Transport bonus", Decimal::from(10_000));
/// assert_eq!(line.label, "Transport bonus");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationLine {
    /// Display label (e.g., "Performance bonus", "Housing allowance").
    pub label: String,
    /// Non-negative amount for the period.
    pub amount: Decimal,
}

impl CompensationLine {
    /// Creates a new line.
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Overtime hours worked in the period, by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeHours {
    /// Ordinary excess hours, paid in tiers.
    #[serde(default)]
    pub regular: Decimal,
    /// Hours worked on a rest day.
    #[serde(default)]
    pub rest_day: Decimal,
    /// Hours worked at night.
    #[serde(default)]
    pub night: Decimal,
}

impl OvertimeHours {
    /// Returns true if no overtime hour of any category was worked.
    pub fn is_zero(&self) -> bool {
        self.regular.is_zero() && self.rest_day.is_zero() && self.night.is_zero()
    }
}

/// Everything the engine needs to compute one employee's pay period.
///
/// The record is built fresh for each computation and is never mutated by the
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationInput {
    /// Contractual monthly gross before bonuses.
    pub base_salary: Decimal,
    /// Contractual hours per month, used to derive the hourly rate.
    pub hours_per_month: Decimal,
    /// Days worked in the period, between 1 and 31.
    pub days_worked: Decimal,
    /// Overtime hours by category.
    #[serde(default)]
    pub overtime_hours: OvertimeHours,
    /// Canonical bonus lines.
    #[serde(default)]
    pub bonuses: Vec<CompensationLine>,
    /// Canonical allowance lines.
    #[serde(default)]
    pub allowances: Vec<CompensationLine>,
}

impl CompensationInput {
    /// Sum of all bonus amounts.
    pub fn bonuses_total(&self) -> Decimal {
        self.bonuses.iter().map(|b| b.amount).sum()
    }

    /// Sum of all allowance amounts.
    pub fn allowances_total(&self) -> Decimal {
        self.allowances.iter().map(|a| a.amount).sum()
    }
}
