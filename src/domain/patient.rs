//! Patient domain model
//!
//! A patient exclusively owns its appointments. The collection and each
//! appointment's back reference are only ever changed together, through
//! [`Patient::add_appointment`] and [`Patient::remove_appointment`].

use super::appointment::{Appointment, PatientRef};
use super::ids::{PatientId, Ssn};

/// A patient and the appointments it owns
///
/// # Examples
///
/// ```
/// use ward::domain::{parse_appointment_date, Appointment, Patient, Ssn};
///
/// let mut patient = Patient::new("Jane Doe", Ssn::new("123-45-6789").unwrap()).unwrap();
/// let when = parse_appointment_date("2025-06-01T09:00:00").unwrap();
/// patient.add_appointment(Appointment::new("Checkup", when).unwrap());
///
/// let owner = patient.appointments()[0].patient().unwrap();
/// assert_eq!(owner.ssn, *patient.ssn());
/// ```
#[derive(Debug, Clone)]
pub struct Patient {
    id: Option<PatientId>,
    name: String,
    ssn: Ssn,
    appointments: Vec<Appointment>,
}

impl Patient {
    /// Creates a new, unsaved patient with no appointments
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is blank.
    pub fn new(name: impl Into<String>, ssn: Ssn) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Patient name is required".to_string());
        }
        Ok(Self {
            id: None,
            name,
            ssn,
            appointments: Vec::new(),
        })
    }

    /// Rebuilds a stored patient together with its appointments
    ///
    /// Back references on the given appointments are overwritten so they
    /// point at this patient.
    pub fn restore(
        id: PatientId,
        name: String,
        ssn: Ssn,
        appointments: Vec<Appointment>,
    ) -> Self {
        let mut patient = Self {
            id: Some(id),
            name,
            ssn,
            appointments: Vec::with_capacity(appointments.len()),
        };
        for appointment in appointments {
            patient.add_appointment(appointment);
        }
        patient
    }

    /// Store-assigned id, if saved
    pub fn id(&self) -> Option<PatientId> {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Business identifier
    pub fn ssn(&self) -> &Ssn {
        &self.ssn
    }

    /// Owned appointments in insertion order
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// The reference appointments hold to this patient
    pub fn to_ref(&self) -> PatientRef {
        PatientRef {
            id: self.id,
            name: self.name.clone(),
            ssn: self.ssn.clone(),
        }
    }

    /// Attaches an appointment and points its back reference at this patient
    pub fn add_appointment(&mut self, mut appointment: Appointment) {
        appointment.set_patient(Some(self.to_ref()));
        self.appointments.push(appointment);
    }

    /// Detaches a saved appointment and clears its back reference
    ///
    /// Matching uses appointment identity, so an unsaved appointment is never
    /// found; use [`Patient::remove_appointment_at`] for those.
    pub fn remove_appointment(&mut self, appointment: &Appointment) -> Option<Appointment> {
        let index = self.appointments.iter().position(|a| a == appointment)?;
        self.remove_appointment_at(index)
    }

    /// Detaches the appointment at `index` and clears its back reference
    pub fn remove_appointment_at(&mut self, index: usize) -> Option<Appointment> {
        if index >= self.appointments.len() {
            return None;
        }
        let mut removed = self.appointments.remove(index);
        removed.set_patient(None);
        Some(removed)
    }

    /// Detaches every appointment, returning them with cleared back references
    pub fn clear_appointments(&mut self) -> Vec<Appointment> {
        let mut removed = std::mem::take(&mut self.appointments);
        for appointment in &mut removed {
            appointment.set_patient(None);
        }
        removed
    }

    /// Records the store-assigned id and refreshes owned back references
    pub(crate) fn assign_id(&mut self, id: PatientId) {
        self.id = Some(id);
        let owner = self.to_ref();
        for appointment in &mut self.appointments {
            appointment.set_patient(Some(owner.clone()));
        }
    }

    // Slice access lets stores assign ids without changing membership.
    pub(crate) fn appointments_mut(&mut self) -> &mut [Appointment] {
        &mut self.appointments
    }
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}
