//! Core data models for the Payroll Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod compensation;
mod pay_period;
mod pay_result;

pub use compensation::{CompensationInput, CompensationLine, OvertimeHours};
pub use pay_period::PayPeriod;
pub use pay_result::{
    AuditStep, AuditTrace, DeductionBreakdown, PayPeriodResult, PayRates, PayslipSummary,
};
