//! Response types for the Payroll Engine API.
//!
//! This module defines the payslip envelopes returned on success, the error
//! response structures, and the mapping from [`EngineError`] to HTTP status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{JurisdictionMetadata, RateTable};
use crate::error::EngineError;
use crate::models::{PayPeriodResult, PayslipSummary};

/// Version stamped on every payslip.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A computed payslip with its identifying envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipResponse {
    /// Unique identifier of this computation.
    pub calculation_id: Uuid,
    /// When the computation ran.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the payslip.
    pub engine_version: String,
    /// The employee the payslip belongs to.
    pub employee_id: String,
    /// Pay period label, `YYYY-MM`.
    pub pay_period: String,
    /// Currency of every amount.
    pub currency: String,
    /// Unrounded computation result, including the audit trace.
    pub result: PayPeriodResult,
    /// Figures rounded to the currency's display scale.
    pub summary: PayslipSummary,
}

impl PayslipResponse {
    /// Wraps a result in a fresh envelope.
    pub fn new(
        employee_id: impl Into<String>,
        pay_period: impl Into<String>,
        jurisdiction: &JurisdictionMetadata,
        result: PayPeriodResult,
    ) -> Self {
        let summary = result.summary(jurisdiction.currency_scale);
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            employee_id: employee_id.into(),
            pay_period: pay_period.into(),
            currency: jurisdiction.currency.clone(),
            result,
            summary,
        }
    }
}

/// Outcome for one employee of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// The employee the outcome belongs to.
    pub employee_id: String,
    /// The payslip, when the computation succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payslip: Option<PayslipResponse>,
    /// Why the computation failed, otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response body for the `/payslips/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Unique identifier of this batch.
    pub batch_id: Uuid,
    /// Number of payslips computed.
    pub succeeded: usize,
    /// Number of employees rejected.
    pub failed: usize,
    /// Unrounded net pay summed across successful payslips.
    pub net_total: Decimal,
    /// One item per employee, in request order.
    pub items: Vec<BatchItem>,
}

/// Response body for the `/rate-tables/:date` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableResponse {
    /// The jurisdiction the table belongs to.
    pub jurisdiction: JurisdictionMetadata,
    /// The version effective on the requested date.
    pub rate_table: RateTable,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidRateTable { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid rate table", message),
            },
            EngineError::RateTableNotFound { date } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "RATE_TABLE_NOT_FOUND",
                    format!("No rate table effective on {}", date),
                    "The jurisdiction has no rate table version starting on or before this date",
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid input '{}': {}", field, message),
                    field,
                ),
            },
        }
    }
}
