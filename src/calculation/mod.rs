//! Calculation logic for the Payroll Engine.
//!
//! This module contains every step of a pay period computation: normalizing
//! heterogeneous bonus and allowance shapes, validating the input, deriving
//! pay rates, pricing tiered overtime, the statutory deductions (social
//! security, income tax on the net categorial salary, communal tax, housing
//! fund, broadcast levy and local development tax) and net pay.
//!
//! Amounts stay unrounded throughout. [`round_for_display`] is applied only
//! when a [`crate::models::PayslipSummary`] is produced.

mod deductions;
mod income_tax;
mod levies;
mod net_pay;
mod normalizer;
mod overtime;
mod pay_rates;
mod payslip;
mod rounding;
mod social_security;
mod validation;

pub use deductions::compute_deductions;
pub use income_tax::{calculate_income_tax, calculate_net_categorial_salary};
pub use levies::{
    calculate_broadcast_levy, calculate_communal_tax, calculate_housing_fund_levy,
    calculate_local_development_tax,
};
pub use net_pay::{calculate_gross_total, calculate_net_pay};
pub use normalizer::{
    AMOUNT_KEYS, LABEL_KEYS, LegacyCompensationFields, NormalizedCompensation, RawCompensation,
    normalize_compensation, normalize_lines, parse_amount,
};
pub use overtime::{OvertimeCategory, OvertimeLine, OvertimeResult, calculate_overtime_pay};
pub use pay_rates::calculate_pay_rates;
pub use payslip::{batch_net_total, compute_batch, compute_pay_period};
pub use rounding::round_for_display;
pub use social_security::calculate_social_security;
pub use validation::validate_input;
