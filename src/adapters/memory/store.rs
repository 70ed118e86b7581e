//! In-process store backend
//!
//! Rows are kept in two maps shaped like the relational schema. A transaction
//! holds the store lock for its whole lifetime and works on a private copy
//! of the rows, which replaces the shared rows only on commit. Dropping a
//! transaction simply discards the copy.

use crate::adapters::store::traits::{HospitalStore, StoreTransaction};
use crate::domain::{
    Appointment, AppointmentId, Patient, PatientId, PatientRef, Result, Ssn, WardError,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone)]
struct PatientRow {
    name: String,
    ssn: Ssn,
}

#[derive(Debug, Clone)]
struct AppointmentRow {
    reason: String,
    appointment_date: NaiveDateTime,
    patient_id: i64,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    last_patient_id: i64,
    last_appointment_id: i64,
    patients: BTreeMap<i64, PatientRow>,
    appointments: BTreeMap<i64, AppointmentRow>,
}

impl MemoryState {
    fn patient_id_by_ssn(&self, ssn: &str) -> Option<i64> {
        self.patients
            .iter()
            .find(|(_, row)| row.ssn.as_str() == ssn)
            .map(|(id, _)| *id)
    }

    fn patient_ref(&self, patient_id: i64) -> Option<PatientRef> {
        self.patients.get(&patient_id).map(|row| PatientRef {
            id: Some(PatientId::new(patient_id)),
            name: row.name.clone(),
            ssn: row.ssn.clone(),
        })
    }

    // Appointment ids ascend with insertion, so map order is insertion order.
    fn load_appointments<F>(&self, mut filter: F) -> Vec<Appointment>
    where
        F: FnMut(&AppointmentRow) -> bool,
    {
        self.appointments
            .iter()
            .filter(|(_, row)| filter(row))
            .filter_map(|(id, row)| {
                let owner = self.patient_ref(row.patient_id)?;
                Some(Appointment::restore(
                    AppointmentId::new(*id),
                    row.reason.clone(),
                    row.appointment_date,
                    owner,
                ))
            })
            .collect()
    }

    fn load_patient(&self, patient_id: i64) -> Option<Patient> {
        let row = self.patients.get(&patient_id)?;
        let appointments = self.load_appointments(|a| a.patient_id == patient_id);
        Some(Patient::restore(
            PatientId::new(patient_id),
            row.name.clone(),
            row.ssn.clone(),
            appointments,
        ))
    }

    fn ensure_unique_ssn(&self, ssn: &Ssn, own_id: Option<i64>) -> Result<()> {
        match self.patient_id_by_ssn(ssn.as_str()) {
            Some(existing) if Some(existing) != own_id => Err(WardError::Conflict(format!(
                "Patient with SSN {ssn} already exists"
            ))),
            _ => Ok(()),
        }
    }

    fn save_patient(&mut self, patient: &mut Patient) -> Result<()> {
        let patient_id = match patient.id() {
            Some(id) => {
                let id = id.get();
                if !self.patients.contains_key(&id) {
                    return Err(WardError::Database(format!("Patient {id} does not exist")));
                }
                self.ensure_unique_ssn(patient.ssn(), Some(id))?;
                id
            }
            None => {
                self.ensure_unique_ssn(patient.ssn(), None)?;
                self.last_patient_id += 1;
                self.last_patient_id
            }
        };

        self.patients.insert(
            patient_id,
            PatientRow {
                name: patient.name().to_string(),
                ssn: patient.ssn().clone(),
            },
        );

        let mut kept = HashSet::new();
        for appointment in patient.appointments_mut() {
            let appointment_id = match appointment.id() {
                Some(id) => id.get(),
                None => {
                    self.last_appointment_id += 1;
                    let id = self.last_appointment_id;
                    appointment.assign_id(AppointmentId::new(id));
                    id
                }
            };
            self.appointments.insert(
                appointment_id,
                AppointmentRow {
                    reason: appointment.reason().to_string(),
                    appointment_date: appointment.appointment_date(),
                    patient_id,
                },
            );
            kept.insert(appointment_id);
        }

        self.appointments
            .retain(|id, row| row.patient_id != patient_id || kept.contains(id));

        patient.assign_id(PatientId::new(patient_id));
        Ok(())
    }
}

/// In-process implementation of [`HospitalStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HospitalStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

/// Transaction over a [`MemoryStore`]
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn find_patient_by_ssn(&mut self, ssn: &str) -> Result<Option<Patient>> {
        Ok(self
            .working
            .patient_id_by_ssn(ssn)
            .and_then(|id| self.working.load_patient(id)))
    }

    async fn exists_patient_by_ssn(&mut self, ssn: &str) -> Result<bool> {
        Ok(self.working.patient_id_by_ssn(ssn).is_some())
    }

    async fn save_patient(&mut self, patient: &mut Patient) -> Result<()> {
        self.working.save_patient(patient)
    }

    async fn find_appointments_by_reason_ignore_case(
        &mut self,
        reason: &str,
    ) -> Result<Vec<Appointment>> {
        let wanted = reason.to_lowercase();
        Ok(self
            .working
            .load_appointments(|row| row.reason.to_lowercase() == wanted))
    }

    async fn find_appointments_by_reason_containing_ignore_case(
        &mut self,
        keyword: &str,
    ) -> Result<Vec<Appointment>> {
        let wanted = keyword.to_lowercase();
        Ok(self
            .working
            .load_appointments(|row| row.reason.to_lowercase().contains(&wanted)))
    }

    async fn find_appointments_by_patient_ssn(&mut self, ssn: &str) -> Result<Vec<Appointment>> {
        match self.working.patient_id_by_ssn(ssn) {
            Some(patient_id) => Ok(self
                .working
                .load_appointments(|row| row.patient_id == patient_id)),
            None => Ok(Vec::new()),
        }
    }

    async fn delete_appointments_by_patient_ssn(&mut self, ssn: &str) -> Result<u64> {
        let Some(patient_id) = self.working.patient_id_by_ssn(ssn) else {
            return Ok(0);
        };
        let before = self.working.appointments.len();
        self.working
            .appointments
            .retain(|_, row| row.patient_id != patient_id);
        Ok((before - self.working.appointments.len()) as u64)
    }

    async fn find_earliest_appointments_by_patient_ssn(
        &mut self,
        ssn: &str,
        limit: usize,
    ) -> Result<Vec<Appointment>> {
        let mut appointments = self.find_appointments_by_patient_ssn(ssn).await?;
        appointments.sort_by_key(|a| (a.appointment_date(), a.id()));
        appointments.truncate(limit);
        Ok(appointments)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
