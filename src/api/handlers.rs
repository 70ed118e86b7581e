//! Hospital API handlers
//!
//! Handlers validate the request shape, call the hospital service and wrap
//! the result in the [`ApiResponse`] envelope.

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{
    appointment_dtos, AppointmentDto, BulkAppointmentRequest, HealthResponse, KeywordQuery,
    PatientDto, ReasonQuery,
};
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::collections::BTreeMap;

/// Create appointments for a patient
///
/// The response `data` is the list of created appointments.
#[utoipa::path(
    post,
    path = "/api/hospital/appointments/bulk",
    tag = "hospital",
    request_body = BulkAppointmentRequest,
    responses(
        (status = 201, description = "Appointments created successfully", body = [AppointmentDto]),
        (status = 400, description = "Validation failed, empty lists or unparseable date"),
        (status = 409, description = "Patient was created concurrently"),
        (status = 500, description = "An unexpected error occurred")
    )
)]
pub async fn bulk_create_appointments(
    State(state): State<AppState>,
    payload: Result<Json<BulkAppointmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<AppointmentDto>>>)> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    request.validate().map_err(ApiError::Validation)?;

    let created = state
        .service
        .bulk_create_appointments(
            &request.patient_name,
            &request.ssn,
            &request.reasons,
            &request.dates,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Appointments created successfully",
            Some(appointment_dtos(&created)),
        )),
    ))
}

/// Get a patient by SSN
#[utoipa::path(
    get,
    path = "/api/hospital/patients/{ssn}",
    tag = "hospital",
    params(("ssn" = String, Path, description = "Patient SSN")),
    responses(
        (status = 200, description = "Patient found", body = PatientDto),
        (status = 404, description = "Patient not found with SSN")
    )
)]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(ssn): Path<String>,
) -> ApiResult<Json<ApiResponse<PatientDto>>> {
    let patient = state.service.find_patient_by_ssn(&ssn).await?;
    Ok(Json(ApiResponse::success(PatientDto::from(&patient))))
}

/// Appointments whose reason matches exactly, ignoring case
#[utoipa::path(
    get,
    path = "/api/hospital/appointments/reason/exact",
    tag = "hospital",
    params(ReasonQuery),
    responses(
        (status = 200, description = "Matching appointments", body = [AppointmentDto]),
        (status = 400, description = "Missing reason")
    )
)]
pub async fn get_appointments_by_reason(
    State(state): State<AppState>,
    Query(query): Query<ReasonQuery>,
) -> ApiResult<Json<ApiResponse<Vec<AppointmentDto>>>> {
    let reason = query
        .reason
        .ok_or_else(|| ApiError::field("reason", "Reason is required"))?;

    let appointments = state.service.get_appointments_by_reason(&reason).await?;
    Ok(Json(ApiResponse::success(appointment_dtos(&appointments))))
}

/// Appointments whose reason contains a keyword, ignoring case
#[utoipa::path(
    get,
    path = "/api/hospital/appointments/reason/contains",
    tag = "hospital",
    params(KeywordQuery),
    responses(
        (status = 200, description = "Matching appointments", body = [AppointmentDto]),
        (status = 400, description = "Missing keyword")
    )
)]
pub async fn get_appointments_containing_reason(
    State(state): State<AppState>,
    Query(query): Query<KeywordQuery>,
) -> ApiResult<Json<ApiResponse<Vec<AppointmentDto>>>> {
    let keyword = query
        .keyword
        .ok_or_else(|| ApiError::field("keyword", "Keyword is required"))?;

    let appointments = state
        .service
        .get_appointments_containing_reason(&keyword)
        .await?;
    Ok(Json(ApiResponse::success(appointment_dtos(&appointments))))
}

/// Delete every appointment of a patient
#[utoipa::path(
    delete,
    path = "/api/hospital/appointments/patient/{ssn}",
    tag = "hospital",
    params(("ssn" = String, Path, description = "Patient SSN")),
    responses(
        (status = 200, description = "Appointments deleted successfully"),
        (status = 404, description = "Patient not found with SSN")
    )
)]
pub async fn delete_appointments(
    State(state): State<AppState>,
    Path(ssn): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let deleted = state.service.delete_appointments_by_ssn(&ssn).await?;
    tracing::debug!(deleted, "Delete request handled");
    Ok(Json(ApiResponse::with_message(
        "Appointments deleted successfully",
        None,
    )))
}

/// First appointment of a patient by date
///
/// Appointments are ordered by date ascending and the first one is returned.
#[utoipa::path(
    get,
    path = "/api/hospital/appointments/latest/{ssn}",
    tag = "hospital",
    params(("ssn" = String, Path, description = "Patient SSN")),
    responses(
        (status = 200, description = "Appointment, or null data when the patient has none", body = AppointmentDto),
        (status = 404, description = "Patient not found with SSN")
    )
)]
pub async fn get_latest_appointment(
    State(state): State<AppState>,
    Path(ssn): Path<String>,
) -> ApiResult<Json<ApiResponse<AppointmentDto>>> {
    let response = match state.service.find_latest_appointment_by_ssn(&ssn).await? {
        Some(appointment) => ApiResponse::success(AppointmentDto::from(&appointment)),
        None => ApiResponse::with_message("No appointments found for patient", None),
    };
    Ok(Json(response))
}

/// Hospital operation counters keyed by metric name
#[utoipa::path(
    get,
    path = "/api/metrics/hospital",
    tag = "metrics",
    responses(
        (status = 200, description = "Hospital metrics retrieved successfully")
    )
)]
pub async fn hospital_metrics(
    State(state): State<AppState>,
) -> Json<ApiResponse<BTreeMap<String, f64>>> {
    Json(ApiResponse::with_message(
        "Hospital metrics retrieved successfully",
        Some(state.metrics.snapshot()),
    ))
}

/// Prometheus text exposition
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "metrics",
    responses(
        (status = 200, description = "Prometheus metrics", body = String, content_type = "text/plain")
    )
)]
pub async fn prometheus_metrics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state.metrics.render()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

/// Health check including a store round trip
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store are reachable", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.service.store();
    let (status, label) = match store.test_connection().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            store: store.backend_name().to_string(),
        }),
    )
}
