//! API error types and handling

use crate::api::models::FieldErrors;
use crate::api::response::ApiResponse;
use crate::domain::{ErrorKind, WardError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Message returned for every unexpected failure
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed shape validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Request body was not valid JSON for the endpoint
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// Failure reported by the hospital service
    #[error(transparent)]
    Service(#[from] WardError),
}

impl ApiError {
    /// Validation failure on a single field
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.to_string());
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Validation failed", Some(errors))),
            )
                .into_response(),
            ApiError::MalformedBody(_) => {
                let response: ApiResponse<()> = ApiResponse::error(self.to_string(), None);
                (StatusCode::BAD_REQUEST, Json(response)).into_response()
            }
            ApiError::Service(error) => {
                let (status, message) = match error.kind() {
                    ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, error.to_string()),
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, error.to_string()),
                    ErrorKind::Conflict => (StatusCode::CONFLICT, error.to_string()),
                    ErrorKind::Unexpected => {
                        crate::log_error_with_context!(&error, "Unhandled request failure");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            UNEXPECTED_ERROR_MESSAGE.to_string(),
                        )
                    }
                };
                let response: ApiResponse<()> = ApiResponse::error(message, None);
                (status, Json(response)).into_response()
            }
        }
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WardError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (WardError::patient_not_found("000-00-0000"), StatusCode::NOT_FOUND),
            (WardError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                WardError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn test_field_validation_is_bad_request() {
        let response = ApiError::field("reason", "Reason is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
