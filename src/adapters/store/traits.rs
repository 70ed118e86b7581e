//! Store abstraction traits
//!
//! This module defines the traits that store backends must implement to
//! hold Ward's patients and appointments.
//!
//! All data access happens inside a [`StoreTransaction`]. A transaction that is
//! dropped without [`StoreTransaction::commit`] must leave no visible effect,
//! which is what makes cancelled requests resolve to a full rollback.

use crate::domain::{Appointment, Patient, Result};
use async_trait::async_trait;

/// Entry point to a store backend
#[async_trait]
pub trait HospitalStore: Send + Sync {
    /// Short backend name used in logs and health output
    fn backend_name(&self) -> &'static str;

    /// Test that the backend is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Create tables and indexes if the backend needs them
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Open a new transaction
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the transaction
    /// cannot be started.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;
}

/// A unit of work against the store
///
/// Every returned entity is fully loaded: patients carry their appointments
/// and appointments carry their owner reference.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Find the patient with the given SSN
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if no patient has that SSN.
    async fn find_patient_by_ssn(&mut self, ssn: &str) -> Result<Option<Patient>>;

    /// Check whether a patient with the given SSN exists
    async fn exists_patient_by_ssn(&mut self, ssn: &str) -> Result<bool>;

    /// Insert or update a patient, cascading to its appointments
    ///
    /// Appointments without an id are inserted. Appointments this transaction
    /// loaded with the patient and that have since left its collection are
    /// removed; rows committed by other transactions are never touched. Ids
    /// assigned by the store are written back into `patient`.
    ///
    /// # Errors
    ///
    /// Returns `WardError::Conflict` if another patient already has the SSN.
    async fn save_patient(&mut self, patient: &mut Patient) -> Result<()>;

    /// Appointments whose reason equals `reason`, ignoring case
    async fn find_appointments_by_reason_ignore_case(
        &mut self,
        reason: &str,
    ) -> Result<Vec<Appointment>>;

    /// Appointments whose reason contains `keyword`, ignoring case
    async fn find_appointments_by_reason_containing_ignore_case(
        &mut self,
        keyword: &str,
    ) -> Result<Vec<Appointment>>;

    /// Appointments owned by the patient with the given SSN
    async fn find_appointments_by_patient_ssn(&mut self, ssn: &str) -> Result<Vec<Appointment>>;

    /// Delete every appointment owned by the patient with the given SSN
    ///
    /// The patient itself is kept.
    ///
    /// # Returns
    ///
    /// Returns the number of deleted appointments.
    async fn delete_appointments_by_patient_ssn(&mut self, ssn: &str) -> Result<u64>;

    /// Appointments of the given SSN ordered by date ascending, at most `limit`
    ///
    /// Ties on the date are broken by id.
    async fn find_earliest_appointments_by_patient_ssn(
        &mut self,
        ssn: &str,
        limit: usize,
    ) -> Result<Vec<Appointment>>;

    /// Make every change of this transaction visible
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; nothing is applied in that case.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every change of this transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}
