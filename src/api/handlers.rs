//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints. The
//! engine itself never logs; every log line and identifier comes from here.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{batch_net_total, compute_batch, compute_pay_period};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::CompensationInput;

use super::request::{BatchRequest, EmployeeCompensation, PayslipRequest};
use super::response::{
    ApiError, ApiErrorResponse, BatchItem, BatchResponse, PayslipResponse, RateTableResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payslips/calculate", post(calculate_handler))
        .route("/payslips/batch", post(batch_handler))
        .route("/rate-tables/:date", get(rate_table_handler))
        .with_state(state)
}

/// Handler for POST /payslips/calculate.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayslipRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match calculate_payslip(&request, state.config()) {
        Ok(payslip) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %payslip.employee_id,
                gross_total = %payslip.result.gross_total,
                net_pay = %payslip.result.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payslip calculated"
            );
            json_response(StatusCode::OK, payslip)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %request.employee.employee_id,
                error = %err,
                "Payslip calculation rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payslips/batch.
///
/// A rejected employee does not fail the batch; only a request-level problem
/// (bad pay period, no rate table) does.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip batch");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let start_time = Instant::now();
    match calculate_batch(&request, state.config()) {
        Ok(batch) => {
            info!(
                correlation_id = %correlation_id,
                employees = batch.items.len(),
                succeeded = batch.succeeded,
                failed = batch.failed,
                net_total = %batch.net_total,
                duration_us = start_time.elapsed().as_micros(),
                "Payslip batch calculated"
            );
            json_response(StatusCode::OK, batch)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Payslip batch rejected"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /rate-tables/:date.
async fn rate_table_handler(State(state): State<AppState>, Path(date): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();

    let parsed = match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(correlation_id = %correlation_id, date = %date, "Invalid rate table date");
            return ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid date '{}'", date),
                    "Expected a date formatted as YYYY-MM-DD",
                ),
            }
            .into_response();
        }
    };

    let config = state.config();
    match config.rate_table_for(parsed) {
        Ok(table) => {
            info!(
                correlation_id = %correlation_id,
                date = %parsed,
                effective_date = %table.effective_date,
                "Rate table served"
            );
            json_response(
                StatusCode::OK,
                RateTableResponse {
                    jurisdiction: config.jurisdiction().clone(),
                    rate_table: table.clone(),
                },
            )
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rate table lookup failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Computes one payslip against the rate table effective at the period start.
fn calculate_payslip(request: &PayslipRequest, config: &ConfigLoader) -> EngineResult<PayslipResponse> {
    request.pay_period.validate()?;
    let table = config.rate_table_for(request.pay_period.start_date)?;
    let result = compute_pay_period(&request.employee.to_input(), table)?;

    Ok(PayslipResponse::new(
        &request.employee.employee_id,
        request.pay_period.label(),
        config.jurisdiction(),
        result,
    ))
}

/// Computes every payslip of a batch against one shared rate table.
fn calculate_batch(request: &BatchRequest, config: &ConfigLoader) -> EngineResult<BatchResponse> {
    request.pay_period.validate()?;
    let table = config.rate_table_for(request.pay_period.start_date)?;

    let inputs: Vec<CompensationInput> = request
        .employees
        .iter()
        .map(EmployeeCompensation::to_input)
        .collect();
    let results = compute_batch(&inputs, table);
    let net_total = batch_net_total(&results);

    let label = request.pay_period.label();
    let items: Vec<BatchItem> = request
        .employees
        .iter()
        .zip(results)
        .map(|(employee, result)| match result {
            Ok(result) => BatchItem {
                employee_id: employee.employee_id.clone(),
                payslip: Some(PayslipResponse::new(
                    &employee.employee_id,
                    label.as_str(),
                    config.jurisdiction(),
                    result,
                )),
                error: None,
            },
            Err(err) => BatchItem {
                employee_id: employee.employee_id.clone(),
                payslip: None,
                error: Some(ApiErrorResponse::from(err).error),
            },
        })
        .collect();

    let succeeded = items.iter().filter(|item| item.payslip.is_some()).count();

    Ok(BatchResponse {
        batch_id: Uuid::new_v4(),
        succeeded,
        failed: items.len() - succeeded,
        net_total,
        items,
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure onto the API error format.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Well-formed JSON with a missing or mistyped value
            match data_error_field(&body_text) {
                Some(field) => ApiError::with_details("VALIDATION_ERROR", &body_text, field),
                None => ApiError::validation_error(body_text),
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Field path from a serde data error, e.g. `pay_period.start_date` out of
/// "...target type: pay_period.start_date: input contains invalid characters".
fn data_error_field(body_text: &str) -> Option<String> {
    let detail = body_text
        .split_once("target type: ")
        .map_or(body_text, |(_, rest)| rest);
    let (path, _) = detail.split_once(": ")?;
    (!path.is_empty() && !path.contains(char::is_whitespace)).then(|| path.to_string())
}
