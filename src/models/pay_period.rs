//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type that identifies the window a
//! payslip covers and selects which rate table version applies.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a pay period with its inclusive date range.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
/// };
/// assert_eq!(period.label(), "2025-03");
/// assert!(period.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Identifier used on payslips and storage keys, as `YYYY-MM` of the start date.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.start_date.year(), self.start_date.month())
    }

    /// Rejects periods that end before they start.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::invalid_input(
                "pay_period",
                format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            ));
        }
        Ok(())
    }
}
