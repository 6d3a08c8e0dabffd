//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading rate tables or
//! computing a pay period.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Payroll Engine.
///
/// All operations in the engine return this error type. Validation errors
/// and configuration errors are always raised before any deduction is
/// produced, so a caller never receives a partial result.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "base_salary".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'base_salary': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No rate table version is effective on the requested date.
    #[error("No rate table effective on {date}")]
    RateTableNotFound {
        /// The date for which a rate table was requested.
        date: NaiveDate,
    },

    /// The rate table is incomplete or internally inconsistent.
    #[error("Invalid rate table: {message}")]
    InvalidRateTable {
        /// A description of what is wrong with the table.
        message: String,
    },

    /// A compensation input field failed validation.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_table(message: impl Into<String>) -> Self {
        EngineError::InvalidRateTable {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
