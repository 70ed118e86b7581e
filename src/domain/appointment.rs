//! Appointment domain model
//!
//! An appointment is owned by exactly one patient. The owner is held as a
//! [`PatientRef`] (identifier plus display data) rather than a pointer, so
//! the patient/appointment pair never forms an ownership cycle.

use super::ids::{AppointmentId, PatientId, Ssn};
use chrono::NaiveDateTime;

/// Accepted date-time layouts: ISO-8601 local date-time, seconds and
/// fraction optional, no offset.
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Back reference from an appointment to its owning patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRef {
    /// Owner id, `None` while the owner has not been saved yet
    pub id: Option<PatientId>,

    /// Owner display name
    pub name: String,

    /// Owner SSN
    pub ssn: Ssn,
}

/// A scheduled visit for a patient
///
/// Equality is identity based: two appointments are equal only when both have
/// been assigned an id by the store and the ids match.
#[derive(Debug, Clone)]
pub struct Appointment {
    id: Option<AppointmentId>,
    reason: String,
    appointment_date: NaiveDateTime,
    patient: Option<PatientRef>,
}

impl Appointment {
    /// Creates a new, unowned and unsaved appointment
    ///
    /// # Errors
    ///
    /// Returns an error if `reason` is blank.
    pub fn new(reason: impl Into<String>, appointment_date: NaiveDateTime) -> Result<Self, String> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err("Reason is required".to_string());
        }
        Ok(Self {
            id: None,
            reason,
            appointment_date,
            patient: None,
        })
    }

    /// Rebuilds a stored appointment
    pub fn restore(
        id: AppointmentId,
        reason: String,
        appointment_date: NaiveDateTime,
        patient: PatientRef,
    ) -> Self {
        Self {
            id: Some(id),
            reason,
            appointment_date,
            patient: Some(patient),
        }
    }

    /// Store-assigned id, if saved
    pub fn id(&self) -> Option<AppointmentId> {
        self.id
    }

    /// Reason for the visit
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Date and time of the visit, as given (no timezone conversion)
    pub fn appointment_date(&self) -> NaiveDateTime {
        self.appointment_date
    }

    /// Owning patient, `None` only before the appointment is attached
    pub fn patient(&self) -> Option<&PatientRef> {
        self.patient.as_ref()
    }

    pub(crate) fn assign_id(&mut self, id: AppointmentId) {
        self.id = Some(id);
    }

    // Only Patient::add_appointment / remove_appointment may call this.
    pub(super) fn set_patient(&mut self, patient: Option<PatientRef>) {
        self.patient = patient;
    }
}

impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Parses an appointment date-time string
///
/// Accepts `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS` and fractional seconds.
/// Offsets and zone designators are rejected.
pub fn parse_appointment_date(raw: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
