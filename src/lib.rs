//! Payroll Engine
//!
//! This crate turns a monthly base salary, overtime hours, bonuses and allowances
//! into statutory deductions and a net payable amount, driven by a versioned
//! rate table loaded from YAML.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
