//! API request and response models
//!
//! Field names follow the camelCase wire format of the hospital API.

use crate::domain::{Appointment, Patient, PatientRef};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

/// Field name to validation message
pub type FieldErrors = BTreeMap<String, String>;

/// Bulk appointment creation request
///
/// Missing fields deserialize to empty values so they are reported by
/// [`BulkAppointmentRequest::validate`] instead of failing JSON decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkAppointmentRequest {
    /// Name used when the SSN is not yet known
    #[serde(default)]
    #[schema(example = "Jane Doe")]
    pub patient_name: String,

    /// Patient SSN (`DDD-DD-DDDD`)
    #[serde(default)]
    #[schema(example = "123-22-4567")]
    pub ssn: String,

    /// Appointment reasons, paired by index with `dates`
    #[serde(default)]
    pub reasons: Vec<String>,

    /// ISO-8601 local date-times, e.g. `2030-01-01T09:00:00`
    #[serde(default)]
    pub dates: Vec<String>,
}

impl BulkAppointmentRequest {
    /// Check required fields before the request reaches the service
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.patient_name.trim().is_empty() {
            errors.insert("patientName".into(), "Patient name is required".into());
        }
        if self.ssn.trim().is_empty() {
            errors.insert("ssn".into(), "SSN is required".into());
        }
        if self.reasons.is_empty() {
            errors.insert("reasons".into(), "At least one reason is required".into());
        }
        if self.dates.is_empty() {
            errors.insert("dates".into(), "At least one date is required".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Query string of the exact reason search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReasonQuery {
    /// Reason to match, ignoring case
    pub reason: Option<String>,
}

/// Query string of the reason substring search
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KeywordQuery {
    /// Text the reason must contain, ignoring case
    pub keyword: Option<String>,
}

/// Patient as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDto {
    /// Display name
    pub name: String,
    /// Patient SSN
    pub ssn: String,
}

impl From<&Patient> for PatientDto {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name().to_string(),
            ssn: patient.ssn().to_string(),
        }
    }
}

impl From<&PatientRef> for PatientDto {
    fn from(patient: &PatientRef) -> Self {
        Self {
            name: patient.name.clone(),
            ssn: patient.ssn.to_string(),
        }
    }
}

/// Appointment as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    /// Reason for the visit
    pub reason: String,

    /// Local date-time of the visit
    pub appointment_date: NaiveDateTime,

    /// Owning patient
    #[serde(rename = "patientDTO")]
    pub patient_dto: Option<PatientDto>,
}

impl From<&Appointment> for AppointmentDto {
    fn from(appointment: &Appointment) -> Self {
        Self {
            reason: appointment.reason().to_string(),
            appointment_date: appointment.appointment_date(),
            patient_dto: appointment.patient().map(PatientDto::from),
        }
    }
}

/// Convert a list of appointments, keeping order
pub fn appointment_dtos(appointments: &[Appointment]) -> Vec<AppointmentDto> {
    appointments.iter().map(AppointmentDto::from).collect()
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: String,
    /// Store backend name
    pub store: String,
}
