//! # REST API for the Loan Calculator
//!
//! Endpoints behind the "Kredi Hesapla" widget: product list, installment
//! summary, payment plan and the down-payment scenario table.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

use crate::domain::CalculatorError;
use crate::AppState;
use shared::{ErrorResponse, InstallmentRequest, ScenarioTableRequest};

/// Create a router for calculator related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/installment", post(calculate_installment))
        .route("/schedule", post(payment_schedule))
        .route("/scenarios", post(scenario_table))
}

/// List the loan products and their default rates
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/calculator/products");
    (StatusCode::OK, Json(state.calculator_service.products().to_vec()))
}

/// Monthly installment, totals and fees for one loan
pub async fn calculate_installment(
    State(state): State<AppState>,
    payload: Result<Json<InstallmentRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("POST /api/calculator/installment - request: {:?}", request);

    match state.calculator_service.calculate_installment(&request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => validation_error(e),
    }
}

/// Month-by-month payment plan
pub async fn payment_schedule(
    State(state): State<AppState>,
    payload: Result<Json<InstallmentRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("POST /api/calculator/schedule - request: {:?}", request);

    match state.calculator_service.build_schedule(&request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => validation_error(e),
    }
}

/// Installments for every configured down-payment percentage and term
pub async fn scenario_table(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioTableRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(rejection),
    };
    info!("POST /api/calculator/scenarios - request: {:?}", request);

    match state.calculator_service.build_scenarios(&request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => validation_error(e),
    }
}

fn validation_error(error: CalculatorError) -> Response {
    warn!("Rejected calculator request: {}", error);
    bad_request(error.to_string())
}

fn invalid_body(rejection: JsonRejection) -> Response {
    warn!("Malformed calculator request: {}", rejection.body_text());
    bad_request(rejection.body_text())
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}
