//! API route definitions

use crate::api::handlers;
use crate::api::models::{AppointmentDto, BulkAppointmentRequest, HealthResponse, PatientDto};
use crate::api::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Hospital, metrics and health routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/api/metrics/hospital", get(handlers::hospital_metrics))
        .route(
            "/api/hospital/appointments/bulk",
            post(handlers::bulk_create_appointments),
        )
        .route("/api/hospital/patients/:ssn", get(handlers::get_patient))
        .route(
            "/api/hospital/appointments/reason/exact",
            get(handlers::get_appointments_by_reason),
        )
        .route(
            "/api/hospital/appointments/reason/contains",
            get(handlers::get_appointments_containing_reason),
        )
        .route(
            "/api/hospital/appointments/patient/:ssn",
            delete(handlers::delete_appointments),
        )
        .route(
            "/api/hospital/appointments/latest/:ssn",
            get(handlers::get_latest_appointment),
        )
}

/// Swagger UI routes
pub fn swagger_routes() -> Router<AppState> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Complete application router
///
/// # Arguments
///
/// * `state` - Shared handler state
/// * `enable_swagger` - Serve the OpenAPI document and Swagger UI
pub fn router(state: AppState, enable_swagger: bool) -> Router {
    let mut routes = api_routes();
    if enable_swagger {
        routes = routes.merge(swagger_routes());
    }

    routes
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// OpenAPI document of the Ward API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::bulk_create_appointments,
        handlers::get_patient,
        handlers::get_appointments_by_reason,
        handlers::get_appointments_containing_reason,
        handlers::delete_appointments,
        handlers::get_latest_appointment,
        handlers::hospital_metrics,
        handlers::prometheus_metrics,
        handlers::health,
    ),
    components(schemas(
        BulkAppointmentRequest,
        AppointmentDto,
        PatientDto,
        HealthResponse,
    )),
    tags(
        (name = "hospital", description = "Patients and appointments. Every JSON response is wrapped as {success, message, data}."),
        (name = "metrics", description = "Operation counters"),
        (name = "health", description = "Liveness and store reachability")
    ),
    info(
        title = "Ward API",
        version = "0.3.0",
        description = "Hospital patient and appointment service"
    )
)]
pub struct ApiDoc;
