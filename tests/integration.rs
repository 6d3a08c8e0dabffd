//! Integration tests for the Payroll Engine HTTP API.
//!
//! This test suite covers:
//! - Gross aggregation of bonuses and allowances
//! - Social security, including the cap
//! - Income tax and the zero-tax minimum wage case
//! - Tiered, rest-day and night overtime
//! - Legacy bonus/allowance field mapping
//! - Batch computation
//! - Rate table lookup
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/cm_general").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn post_calculate(router: Router, body: Value) -> (StatusCode, Value) {
    post(router, "/payslips/calculate", body).await
}

fn create_request(employee_id: &str, base_salary: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "pay_period": { "start_date": "2025-03-01", "end_date": "2025-03-31" },
        "base_salary": base_salary,
        "hours_per_month": "173.33",
        "days_worked": 30
    })
}

fn assert_amount(value: &Value, expected: &str) {
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {}", value));
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "amount mismatch"
    );
}

fn audit_rule_ids(result: &Value) -> Vec<String> {
    result["result"]["audit_trace"]["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["rule_id"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// SECTION 1: Gross and deductions
// =============================================================================

#[tokio::test]
async fn test_bonuses_and_allowances_aggregate_into_gross() {
    let router = create_router_for_test();
    let mut request = create_request("emp_a", "250000");
    request["bonuses"] = json!([
        { "label": "Performance bonus", "amount": 33000 },
        { "label": "Transport bonus", "amount": 10000 }
    ]);
    request["allowances"] = json!([{ "label": "Housing allowance", "amount": 20000 }]);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["result"]["gross_total"], "313000");
    assert_amount(&result["result"]["deductions"]["social_security"], "10500");
    assert_amount(&result["summary"]["gross_total"], "313000");
    assert_eq!(result["result"]["bonuses"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_full_deduction_breakdown_for_250000() {
    let router = create_router_for_test();

    let (status, result) = post_calculate(router, create_request("emp_b", "250000")).await;

    assert_eq!(status, StatusCode::OK);
    let summary = &result["summary"];
    assert_amount(&summary["social_security"], "10500");
    assert_amount(&summary["income_tax"], "12283");
    assert_amount(&summary["communal_tax"], "1228");
    assert_amount(&summary["housing_fund_levy"], "2500");
    assert_amount(&summary["broadcast_levy"], "750");
    assert_amount(&summary["local_development_tax"], "1500");
    assert_amount(&summary["deductions_total"], "28762");
    assert_amount(&summary["net_pay"], "221238");
}

#[tokio::test]
async fn test_minimum_wage_pays_no_income_tax() {
    let router = create_router_for_test();

    let (status, result) = post_calculate(router, create_request("emp_c", "36270")).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["result"]["gross_total"], "36270");
    assert_amount(&result["summary"]["social_security"], "1523");
    assert_amount(&result["summary"]["income_tax"], "0");
    assert_amount(&result["summary"]["broadcast_levy"], "0");
    assert_amount(&result["summary"]["local_development_tax"], "0");
}

#[tokio::test]
async fn test_social_security_is_capped() {
    let router = create_router_for_test();

    let (status, result) = post_calculate(router, create_request("emp_d", "1000000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["result"]["deductions"]["social_security"], "31500");
    assert_amount(&result["summary"]["local_development_tax"], "2500");
}

#[tokio::test]
async fn test_ncs_only_appears_in_audit_trace() {
    let router = create_router_for_test();

    let (status, result) = post_calculate(router, create_request("emp_e", "250000")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(audit_rule_ids(&result).contains(&"net_categorial_salary".to_string()));
    assert!(result["summary"].get("net_categorial_salary").is_none());
    assert!(result["result"]["deductions"].get("net_categorial_salary").is_none());
}

// =============================================================================
// SECTION 2: Overtime
// =============================================================================

#[tokio::test]
async fn test_regular_overtime_is_tiered() {
    // Hourly rate 173,000 / 173 = 1,000
    // 8 × 1,200 + 8 × 1,300 + 4 × 1,400 = 25,600
    let router = create_router_for_test();
    let mut request = create_request("emp_ot1", "173000");
    request["hours_per_month"] = json!(173);
    request["overtime_hours"] = json!({ "regular": 20 });

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["result"]["rates"]["hourly_rate"], "1000");
    assert_amount(&result["result"]["overtime_pay"], "25600");
    assert_amount(&result["result"]["gross_total"], "198600");
}

#[tokio::test]
async fn test_rest_day_and_night_overtime() {
    // 5 × 1,000 × 1.4 + 2 × 1,000 × 1.5 = 10,000
    let router = create_router_for_test();
    let mut request = create_request("emp_ot2", "173000");
    request["hours_per_month"] = json!(173);
    request["overtime_hours"] = json!({ "rest_day": 5, "night": 2 });

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&result["result"]["overtime_pay"], "10000");
}

#[tokio::test]
async fn test_overtime_does_not_change_deductions() {
    let mut plain = create_request("emp_ot3", "173000");
    plain["hours_per_month"] = json!(173);
    let mut with_overtime = plain.clone();
    with_overtime["overtime_hours"] = json!({ "regular": 12 });

    let (_, plain_result) = post_calculate(create_router_for_test(), plain).await;
    let (_, overtime_result) = post_calculate(create_router_for_test(), with_overtime).await;

    assert_eq!(
        plain_result["result"]["deductions"],
        overtime_result["result"]["deductions"]
    );
}

// =============================================================================
// SECTION 3: Legacy shapes
// =============================================================================

#[tokio::test]
async fn test_legacy_fields_map_to_lines() {
    let router = create_router_for_test();
    let mut request = create_request("emp_legacy", "250000");
    request["performance_bonus"] = json!("33 000");
    request["transport_bonus"] = json!(10000);
    request["overtime_amount"] = json!(0);
    request["housing_allowance"] = json!("20000");
    request["meal_allowance"] = json!(-500);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let bonuses = result["result"]["bonuses"].as_array().unwrap();
    assert_eq!(bonuses.len(), 2);
    assert_eq!(bonuses[0]["label"], "Performance bonus");
    let allowances = result["result"]["allowances"].as_array().unwrap();
    assert_eq!(allowances.len(), 1);
    assert_eq!(allowances[0]["label"], "Housing allowance");
    assert_amount(&result["result"]["gross_total"], "313000");
}

#[tokio::test]
async fn test_alternative_amount_keys() {
    let router = create_router_for_test();
    let mut request = create_request("emp_keys", "250000");
    request["bonuses"] = json!([
        { "libelle": "Prime", "montant": "1000" },
        { "name": "Gift", "value": 2000 },
        { "total": "3000,50" }
    ]);

    let (status, result) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::OK);
    let bonuses = result["result"]["bonuses"].as_array().unwrap();
    assert_eq!(bonuses[0]["label"], "Prime");
    assert_eq!(bonuses[2]["label"], "Bonus 3");
    assert_amount(&result["result"]["gross_total"], "256000.50");
}

// =============================================================================
// SECTION 4: Envelope, batch and rate tables
// =============================================================================

#[tokio::test]
async fn test_envelope_identifies_each_calculation() {
    let request = create_request("emp_env", "250000");

    let (_, first) = post_calculate(create_router_for_test(), request.clone()).await;
    let (_, second) = post_calculate(create_router_for_test(), request).await;

    assert_eq!(first["employee_id"], "emp_env");
    assert_eq!(first["pay_period"], "2025-03");
    assert_eq!(first["currency"], "XAF");
    assert!(first["timestamp"].is_string());
    assert_ne!(first["calculation_id"], second["calculation_id"]);
    assert_eq!(first["result"], second["result"]);
}

#[tokio::test]
async fn test_batch_computes_employees_independently() {
    let router = create_router_for_test();
    let body = json!({
        "pay_period": { "start_date": "2025-03-01", "end_date": "2025-03-31" },
        "employees": [
            { "employee_id": "a", "base_salary": 250000, "hours_per_month": 173, "days_worked": 30 },
            { "employee_id": "b", "base_salary": 250000, "hours_per_month": 173, "days_worked": 30,
              "overtime_hours": { "night": -1 } },
            { "employee_id": "c", "base_salary": 36270, "hours_per_month": 173, "days_worked": 30 }
        ]
    });

    let (status, batch) = post(router, "/payslips/batch", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(batch["succeeded"], 2);
    assert_eq!(batch["failed"], 1);
    let items = batch["items"].as_array().unwrap();
    assert_eq!(items[1]["employee_id"], "b");
    assert_eq!(items[1]["error"]["details"], "overtime_hours.night");
    assert_amount(&items[2]["payslip"]["summary"]["social_security"], "1523");
}

#[tokio::test]
async fn test_rate_table_lookup_returns_effective_version() {
    let router = create_router_for_test();

    let (status, body) = send(
        router,
        Request::builder()
            .uri("/rate-tables/2025-01-01")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jurisdiction"]["currency"], "XAF");
    assert_eq!(body["rate_table"]["effective_date"], "2024-01-01");
    assert_eq!(
        body["rate_table"]["income_tax"]["brackets"]
            .as_array()
            .unwrap()
            .len(),
        4
    );
}

// =============================================================================
// SECTION 5: Error Cases
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let router = create_router_for_test();

    let (status, error) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/payslips/calculate")
            .header("Content-Type", "application/json")
            .body(Body::from("{invalid json"))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_base_salary() {
    let router = create_router_for_test();
    let mut request = create_request("emp_001", "250000");
    request.as_object_mut().unwrap().remove("base_salary");

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_error_non_numeric_base_salary() {
    let router = create_router_for_test();
    let mut request = create_request("emp_001", "250000");
    request["base_salary"] = json!("abc");

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_error_mistyped_pay_period_date() {
    let router = create_router_for_test();
    let mut request = create_request("emp_001", "250000");
    request["pay_period"]["start_date"] = json!("March 1st");

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_error_oversized_base_salary() {
    let router = create_router_for_test();
    let request = create_request("emp_001", "10000000000000000000000000000");

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "base_salary");
}

#[tokio::test]
async fn test_error_negative_days_worked() {
    let router = create_router_for_test();
    let mut request = create_request("emp_001", "250000");
    request["days_worked"] = json!(-1);

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "days_worked");
}

#[tokio::test]
async fn test_error_negative_overtime_hours() {
    let router = create_router_for_test();
    let mut request = create_request("emp_001", "250000");
    request["overtime_hours"] = json!({ "regular": -3 });

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "overtime_hours.regular");
}

#[tokio::test]
async fn test_error_negative_base_salary() {
    let router = create_router_for_test();

    let (status, error) = post_calculate(router, create_request("emp_001", "-100")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"], "base_salary");
}

#[tokio::test]
async fn test_error_inverted_pay_period() {
    let router = create_router_for_test();
    let mut request = create_request("emp_001", "250000");
    request["pay_period"] = json!({ "start_date": "2025-03-31", "end_date": "2025-03-01" });

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"], "pay_period");
}

#[tokio::test]
async fn test_error_no_rate_table_for_period() {
    let router = create_router_for_test();
    let mut request = create_request("emp_001", "250000");
    request["pay_period"] = json!({ "start_date": "2020-03-01", "end_date": "2020-03-31" });

    let (status, error) = post_calculate(router, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "RATE_TABLE_NOT_FOUND");
}
