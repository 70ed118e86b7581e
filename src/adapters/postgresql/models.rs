//! PostgreSQL row models
//!
//! This module maps rows of the `patients` and `appointments` tables to
//! domain entities.

use crate::domain::{
    Appointment, AppointmentId, Patient, PatientId, PatientRef, Result, Ssn, WardError,
};
use chrono::NaiveDateTime;
use tokio_postgres::Row;

/// Select list used by every appointment query (`a` = appointments, `p` = patients)
pub const APPOINTMENT_COLUMNS: &str = "a.id, a.reason, a.appointment_date, \
     p.id AS patient_id, p.name AS patient_name, p.ssn AS patient_ssn";

/// Row of the `patients` table
#[derive(Debug, Clone)]
pub struct PatientRecord {
    /// Primary key
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique SSN
    pub ssn: String,
}

impl PatientRecord {
    /// Read a record from a row selected as `id, name, ssn`
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: column(row, "id")?,
            name: column(row, "name")?,
            ssn: column(row, "ssn")?,
        })
    }

    /// Convert to a domain Patient owning the given appointments
    pub fn to_domain(&self, appointments: Vec<Appointment>) -> Result<Patient> {
        Ok(Patient::restore(
            PatientId::new(self.id),
            self.name.clone(),
            stored_ssn(&self.ssn)?,
            appointments,
        ))
    }
}

/// An appointment row joined with its owner
#[derive(Debug, Clone)]
pub struct AppointmentRecord {
    /// Primary key
    pub id: i64,

    /// Reason for the visit
    pub reason: String,

    /// Visit date and time (TIMESTAMP WITHOUT TIME ZONE)
    pub appointment_date: NaiveDateTime,

    /// Owner primary key
    pub patient_id: i64,

    /// Owner display name
    pub patient_name: String,

    /// Owner SSN
    pub patient_ssn: String,
}

impl AppointmentRecord {
    /// Read a record from a row selected with [`APPOINTMENT_COLUMNS`]
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: column(row, "id")?,
            reason: column(row, "reason")?,
            appointment_date: column(row, "appointment_date")?,
            patient_id: column(row, "patient_id")?,
            patient_name: column(row, "patient_name")?,
            patient_ssn: column(row, "patient_ssn")?,
        })
    }

    /// Convert to a domain Appointment
    pub fn to_domain(&self) -> Result<Appointment> {
        let owner = PatientRef {
            id: Some(PatientId::new(self.patient_id)),
            name: self.patient_name.clone(),
            ssn: stored_ssn(&self.patient_ssn)?,
        };
        Ok(Appointment::restore(
            AppointmentId::new(self.id),
            self.reason.clone(),
            self.appointment_date,
            owner,
        ))
    }
}

/// Convert a set of joined rows into domain appointments, keeping row order
pub fn appointments_from_rows(rows: &[Row]) -> Result<Vec<Appointment>> {
    rows.iter()
        .map(|row| AppointmentRecord::from_row(row)?.to_domain())
        .collect()
}

fn column<'a, T>(row: &'a Row, name: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name)
        .map_err(|e| WardError::Database(format!("Failed to read column {name}: {e}")))
}

fn stored_ssn(raw: &str) -> Result<Ssn> {
    Ssn::new(raw).map_err(|e| WardError::Database(format!("Stored SSN '{raw}' is invalid: {e}")))
}
