//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - JSON-formatted log files with rotation
//! - `RUST_LOG` style filtering
//!
//! # Example
//!
//! ```no_run
//! use ward::logging::init_logging;
//! use ward::config::LoggingConfig;
//!
//! let config = LoggingConfig::console_only();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(ssn = "123-45-6789", "Creating new patient");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a hospital service operation
///
/// # Example
///
/// ```no_run
/// use ward::log_operation_start;
///
/// log_operation_start!("bulk_create_appointments", "123-45-6789");
/// ```
#[macro_export]
macro_rules! log_operation_start {
    ($operation:expr, $subject:expr) => {
        tracing::debug!(
            operation = $operation,
            subject = %$subject,
            "Starting operation"
        );
    };
}

/// Log the completion of a hospital service operation
///
/// # Example
///
/// ```no_run
/// use ward::log_operation_complete;
/// use std::time::Duration;
///
/// log_operation_complete!("delete_appointments_by_ssn", 3, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_operation_complete {
    ($operation:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            operation = $operation,
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Operation completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ward::log_error_with_context;
/// use ward::domain::WardError;
///
/// let error = WardError::Database("connection reset".to_string());
/// log_error_with_context!(&error, "Failed to commit transaction");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
