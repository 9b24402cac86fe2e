use axum::{
    Router,
    extract::{Json, Query, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    AffordabilityError, AffordabilityInput, AffordabilityReport, AffordabilityResult, FieldError,
    FormFields, calculate, validation_errors,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ResponseStatus {
    Ok,
    Incomplete,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AffordabilityResponse {
    status: ResponseStatus,
    input: AffordabilityInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<AffordabilityResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<AffordabilityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/affordability",
            get(affordability_get_handler).post(affordability_post_handler),
        )
        .route("/api/affordability/defaults", get(defaults_handler))
        .route("/healthz", get(health_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "affordability HTTP API listening");

    axum::serve(listener, router()).await
}

async fn affordability_get_handler(Query(payload): Query<FormFields>) -> Response {
    affordability_handler_impl(payload)
}

async fn affordability_post_handler(payload: Result<Json<FormFields>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => affordability_handler_impl(payload),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected affordability payload");
            error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: format!("Invalid API JSON payload: {}", rejection.body_text()),
                    kind: None,
                    fields: Vec::new(),
                },
            )
        }
    }
}

async fn defaults_handler() -> Response {
    json_response(StatusCode::OK, AffordabilityInput::default())
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorResponse {
            error: "Not found".to_string(),
            kind: None,
            fields: Vec::new(),
        },
    )
}

fn affordability_handler_impl(payload: FormFields) -> Response {
    let input = match input_from_payload(&payload) {
        Ok(input) => input,
        Err(fields) => {
            warn!(invalid_fields = fields.len(), "rejected affordability input");
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Please enter a valid positive number".to_string(),
                    kind: None,
                    fields,
                },
            );
        }
    };

    let outcome = calculate(&input);
    debug!(?input, ok = outcome.is_ok(), "calculated affordability");
    let (status, body) = build_affordability_response(input, outcome);
    match body {
        Ok(body) => json_response(status, body),
        Err(body) => error_response(status, body),
    }
}

fn input_from_payload(payload: &FormFields) -> Result<AffordabilityInput, Vec<FieldError>> {
    let input = payload.collect();
    let errors = validation_errors(&input);
    if errors.is_empty() {
        Ok(input)
    } else {
        Err(errors)
    }
}

fn build_affordability_response(
    input: AffordabilityInput,
    outcome: Result<AffordabilityResult, AffordabilityError>,
) -> (StatusCode, Result<AffordabilityResponse, ErrorResponse>) {
    match outcome {
        Ok(result) => (
            StatusCode::OK,
            Ok(AffordabilityResponse {
                status: ResponseStatus::Ok,
                input,
                result: Some(result),
                report: Some(AffordabilityReport::from_result(&result)),
                message: None,
            }),
        ),
        Err(AffordabilityError::DegenerateInput) => (
            StatusCode::OK,
            Ok(AffordabilityResponse {
                status: ResponseStatus::Incomplete,
                input,
                result: None,
                report: None,
                message: Some(AffordabilityError::DegenerateInput.to_string()),
            }),
        ),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Err(ErrorResponse {
                error: err.to_string(),
                kind: Some(err.kind()),
                fields: Vec::new(),
            }),
        ),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    json_response(status, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Field, FieldProblem};

    fn payload_from_json(json: &str) -> FormFields {
        serde_json::from_str(json).expect("json should parse")
    }

    #[test]
    fn input_from_payload_parses_web_keys() {
        let payload = payload_from_json(
            r#"{
              "grossIncome": "98,500",
              "monthlyDebts": 250,
              "downPaymentPercent": "10",
              "interestRate": 6.5,
              "loanTerm": 15,
              "propertyTaxRate": "0.9",
              "insuranceAnnual": "1,800"
            }"#,
        );
        let input = input_from_payload(&payload).expect("valid payload");

        assert_eq!(input.gross_income, 98_500.0);
        assert_eq!(input.monthly_debts, 250.0);
        assert_eq!(input.down_payment_percent, 10.0);
        assert_eq!(input.interest_rate, 6.5);
        assert_eq!(input.loan_term, 15.0);
        assert_eq!(input.property_tax_rate, 0.9);
        assert_eq!(input.insurance_annual, 1_800.0);
    }

    #[test]
    fn input_from_payload_uses_default_profile_for_missing_keys() {
        let input = input_from_payload(&payload_from_json("{}")).expect("defaults are valid");
        assert_eq!(input, AffordabilityInput::default());
    }

    #[test]
    fn input_from_payload_reports_negative_fields() {
        let payload = payload_from_json(r#"{"monthlyDebts": -10, "loanTerm": "-30"}"#);
        let errors = input_from_payload(&payload).expect_err("negatives are invalid");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, Field::MonthlyDebts);
        assert_eq!(errors[1].field, Field::LoanTerm);
        assert!(errors.iter().all(|e| e.problem == FieldProblem::Negative));
    }

    #[test]
    fn affordability_response_serialization_contains_expected_fields() {
        let input = AffordabilityInput::default();
        let (status, body) = build_affordability_response(input, calculate(&input));
        assert_eq!(status, StatusCode::OK);

        let json = serde_json::to_string(&body.expect("success body")).expect("serialize");
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"maxHomePrice\""));
        assert!(json.contains("\"totalMonthlyPayment\""));
        assert!(json.contains("\"dtiRatio\""));
        assert!(json.contains("\"housingGuideline\""));
        assert!(json.contains("\"grossIncome\":75000.0"));
        assert!(!json.contains("\"message\""));
    }

    #[test]
    fn degenerate_input_is_reported_as_incomplete() {
        let mut input = AffordabilityInput::default();
        input.interest_rate = 0.0;
        let (status, body) = build_affordability_response(input, calculate(&input));
        assert_eq!(status, StatusCode::OK);

        let body = body.expect("incomplete is not an error");
        assert_eq!(body.status, ResponseStatus::Incomplete);
        assert!(body.result.is_none());
        assert!(body.message.is_some());
    }

    #[test]
    fn advisory_errors_map_to_unprocessable_entity() {
        let mut input = AffordabilityInput::default();
        input.down_payment_percent = 100.0;
        let (status, body) = build_affordability_response(input, calculate(&input));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body = body.expect_err("advisory error");
        assert_eq!(body.kind, Some("invalid-down-payment"));
    }
}
