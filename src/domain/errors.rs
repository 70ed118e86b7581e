//! Domain error types
//!
//! This module defines the error hierarchy for Ward. Business-rule failures
//! (`InvalidInput`, `NotFound`, `Conflict`) are distinct variants so the API layer
//! can map them to transport statuses; everything else is an unexpected failure.
//! Errors never expose third-party types.

use thiserror::Error;

/// Main Ward error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum WardError {
    /// Caller supplied input that breaks a business precondition
    #[error("{0}")]
    InvalidInput(String),

    /// A record required by the operation does not exist
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (e.g. two patients with one SSN)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Error taxonomy seen by callers of the hospital service
///
/// Anything not anticipated by the business rules collapses to `Unexpected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty lists, unparseable dates, malformed identifiers
    InvalidInput,
    /// No patient for the given SSN
    NotFound,
    /// Storage-level uniqueness violation
    Conflict,
    /// Everything else
    Unexpected,
}

impl WardError {
    /// Classifies this error into the caller-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            WardError::InvalidInput(_) => ErrorKind::InvalidInput,
            WardError::NotFound(_) => ErrorKind::NotFound,
            WardError::Conflict(_) => ErrorKind::Conflict,
            _ => ErrorKind::Unexpected,
        }
    }

    /// Shorthand for the "no patient with this SSN" failure
    pub fn patient_not_found(ssn: &str) -> Self {
        WardError::NotFound(format!("Patient not found with SSN: {ssn}"))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for WardError {
    fn from(err: std::io::Error) -> Self {
        WardError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for WardError {
    fn from(err: serde_json::Error) -> Self {
        WardError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for WardError {
    fn from(err: toml::de::Error) -> Self {
        WardError::Configuration(format!("TOML parse error: {err}"))
    }
}
