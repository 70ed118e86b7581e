//! Domain models and types for Ward.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Validated identifiers** ([`Ssn`], [`PatientId`], [`AppointmentId`])
//! - **Entities** ([`Patient`], [`Appointment`]) and the operations that keep
//!   the patient/appointment relationship consistent
//! - **Error types** ([`WardError`], [`ErrorKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, WardError>`]:
//!
//! ```rust
//! use ward::domain::{Ssn, WardError, Result};
//!
//! fn lookup_key(raw: &str) -> Result<Ssn> {
//!     Ssn::new(raw).map_err(WardError::InvalidInput)
//! }
//!
//! assert!(lookup_key("123-45-6789").is_ok());
//! assert!(lookup_key("nope").is_err());
//! ```

pub mod appointment;
pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use appointment::{parse_appointment_date, Appointment, PatientRef};
pub use errors::{ErrorKind, WardError};
pub use ids::{AppointmentId, PatientId, Ssn};
pub use patient::Patient;
pub use result::Result;
