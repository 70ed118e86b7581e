//! Response envelope shared by every JSON endpoint

use serde::{Deserialize, Serialize};

/// Default message of a successful response
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Operation completed successfully";

/// `{"success": bool, "message": string, "data": T | null}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Payload, `null` on absence or error
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response with the default message
    pub fn success(data: T) -> Self {
        Self::with_message(DEFAULT_SUCCESS_MESSAGE, Some(data))
    }

    /// Successful response with a custom message
    pub fn with_message(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Failed response
    pub fn error(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}
