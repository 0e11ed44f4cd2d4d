//! HTTP request handlers for the RCTI engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_lunch_break_lines, generate_invoice_number, invoice_number_base, price_job_lines,
};
use crate::error::EngineResult;
use crate::models::{CompletedJob, Rcti};
use crate::store::DeductionStore;

use super::request::{DraftRequest, FinaliseRequest};
use super::response::{ApiError, ApiErrorResponse, FinaliseResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rctis/draft", post(draft_handler))
        .route("/rctis/finalise", post(finalise_handler))
        .with_state(state)
}

/// Handler for POST /rctis/draft.
///
/// Runs the full draft pipeline for one driver-week: prices the submitted
/// jobs against the rate card, derives lunch-break deduction lines,
/// aggregates totals, and assigns a unique invoice number.
async fn draft_handler(
    State(state): State<AppState>,
    payload: Result<Json<DraftRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing draft request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    match build_draft(&state, &request) {
        Ok(rcti) => {
            info!(
                correlation_id = %correlation_id,
                invoice_number = %rcti.invoice_number,
                lines = rcti.lines.len(),
                "Draft created"
            );
            (StatusCode::CREATED, Json(rcti)).into_response()
        }
        Err(error) => {
            warn!(correlation_id = %correlation_id, error = %error, "Draft failed");
            let api_error: ApiErrorResponse = error.into();
            api_error.into_response()
        }
    }
}

/// Runs the draft pipeline against the loaded configuration and store.
fn build_draft(state: &AppState, request: &DraftRequest) -> EngineResult<Rcti> {
    let config = state.config();
    let driver = config.get_driver(&request.driver)?;
    let regime = driver.gst_regime()?;

    let jobs: Vec<CompletedJob> = request.jobs.iter().cloned().map(Into::into).collect();

    let mut lines = price_job_lines(&jobs, request.week_ending, config.config(), &regime)?;
    let break_lines = calculate_lunch_break_lines(&lines, driver.break_hours, &regime)?;
    lines.extend(break_lines);

    let base = invoice_number_base(request.week_ending, &driver.name);
    let used = state.store().used_invoice_numbers(&base)?;
    let invoice_number = generate_invoice_number(&used, request.week_ending, &driver.name);
    state.store().record_invoice_number(&invoice_number)?;

    Ok(Rcti::draft(
        driver.id,
        request.week_ending,
        invoice_number,
        lines,
    ))
}

/// Handler for POST /rctis/finalise.
///
/// Applies every due recurring deduction for the driver to the invoice
/// being finalised and returns the applications created. Safe to retry:
/// reprocessing the same week-ending creates nothing.
async fn finalise_handler(
    State(state): State<AppState>,
    payload: Result<Json<FinaliseRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing finalise request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let result = state.store().apply_deductions_to_rcti(
        request.rcti_id,
        request.driver_id,
        request.week_ending,
        &request.amount_overrides,
    );

    match result {
        Ok(applications) => {
            info!(
                correlation_id = %correlation_id,
                rcti_id = %request.rcti_id,
                applications = applications.len(),
                "Deductions applied"
            );
            (StatusCode::OK, Json(FinaliseResponse { applications })).into_response()
        }
        Err(error) => {
            warn!(correlation_id = %correlation_id, error = %error, "Finalise failed");
            let api_error: ApiErrorResponse = error.into();
            api_error.into_response()
        }
    }
}

/// Maps a JSON extraction rejection onto the API error shape.
fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> axum::response::Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}
