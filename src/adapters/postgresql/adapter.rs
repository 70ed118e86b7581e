//! PostgreSQL adapter implementing the store traits
//!
//! Each [`PostgreSQLTransaction`] pins one pooled connection between `BEGIN`
//! and `COMMIT`/`ROLLBACK`. A transaction that is dropped unfinished detaches
//! its connection from the pool and closes it, which makes the server roll
//! the work back.
//!
//! Saving a patient only inserts its new appointments. Rows are removed only
//! when this transaction loaded them and they have since left the patient's
//! collection, so appointments committed by a concurrent transaction survive.

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    appointments_from_rows, PatientRecord, APPOINTMENT_COLUMNS,
};
use crate::adapters::store::traits::{HospitalStore, StoreTransaction};
use crate::domain::{Appointment, AppointmentId, Patient, PatientId, Result, WardError};
use async_trait::async_trait;
use deadpool_postgres::Object;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_postgres::error::SqlState;

/// PostgreSQL implementation of [`HospitalStore`]
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    /// Create a new PostgreSQL store
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Create a new PostgreSQL store with an Arc-wrapped client
    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

#[async_trait]
impl HospitalStore for PostgreSQLStore {
    fn backend_name(&self) -> &'static str {
        "postgresql"
    }

    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let conn = self.client.get_connection().await?;

        conn.batch_execute(&format!(
            "BEGIN; SET LOCAL statement_timeout = {}",
            self.client.statement_timeout_ms()
        ))
        .await
        .map_err(|e| WardError::Database(format!("Failed to begin transaction: {}", e)))?;

        tracing::trace!("PostgreSQL transaction started");
        Ok(Box::new(PostgreSQLTransaction {
            conn: Some(conn),
            loaded: HashMap::new(),
        }))
    }
}

/// Transaction over a [`PostgreSQLStore`]
pub struct PostgreSQLTransaction {
    conn: Option<Object>,
    // patient id -> appointment ids read or written by this transaction
    loaded: HashMap<i64, Vec<i64>>,
}

impl PostgreSQLTransaction {
    fn conn(&self) -> Result<&Object> {
        self.conn
            .as_ref()
            .ok_or_else(|| WardError::Database("Transaction already finished".to_string()))
    }

    async fn appointments_where(
        &self,
        predicate: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Appointment>> {
        let query = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments a \
             JOIN patients p ON p.id = a.patient_id \
             WHERE {predicate}"
        );
        let rows = self
            .conn()?
            .query(&query, params)
            .await
            .map_err(|e| WardError::Database(format!("Query failed: {}", e)))?;
        appointments_from_rows(&rows)
    }

    async fn finish(&mut self, statement: &str) -> Result<()> {
        let conn = self
            .conn
            .take()
            .ok_or_else(|| WardError::Database("Transaction already finished".to_string()))?;

        match conn.batch_execute(statement).await {
            Ok(()) => Ok(()),
            Err(e) => {
                // Connection state is unknown; keep it out of the pool.
                drop(Object::take(conn));
                Err(WardError::Database(format!("{} failed: {}", statement, e)))
            }
        }
    }
}

/// Ids loaded earlier that are missing from the current collection
fn detached_ids(loaded: &[i64], current: &[i64]) -> Vec<i64> {
    loaded
        .iter()
        .copied()
        .filter(|id| !current.contains(id))
        .collect()
}

fn write_error(context: &str, error: tokio_postgres::Error) -> WardError {
    if error.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        return WardError::Conflict(format!("{}: {}", context, error));
    }
    WardError::Database(format!("{}: {}", context, error))
}

#[async_trait]
impl StoreTransaction for PostgreSQLTransaction {
    async fn find_patient_by_ssn(&mut self, ssn: &str) -> Result<Option<Patient>> {
        let row = self
            .conn()?
            .query_opt("SELECT id, name, ssn FROM patients WHERE ssn = $1", &[&ssn])
            .await
            .map_err(|e| WardError::Database(format!("Failed to load patient: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let record = PatientRecord::from_row(&row)?;
        let appointments = self
            .appointments_where("p.id = $1 ORDER BY a.id", &[&record.id])
            .await?;

        self.loaded.insert(
            record.id,
            appointments
                .iter()
                .filter_map(|a| a.id().map(|id| id.get()))
                .collect(),
        );
        tracing::debug!(patient_id = record.id, "Loaded patient");
        record.to_domain(appointments).map(Some)
    }

    async fn exists_patient_by_ssn(&mut self, ssn: &str) -> Result<bool> {
        let row = self
            .conn()?
            .query_one(
                "SELECT EXISTS(SELECT 1 FROM patients WHERE ssn = $1)",
                &[&ssn],
            )
            .await
            .map_err(|e| WardError::Database(format!("Failed to check patient: {}", e)))?;

        row.try_get(0)
            .map_err(|e| WardError::Database(format!("Failed to read existence flag: {}", e)))
    }

    async fn save_patient(&mut self, patient: &mut Patient) -> Result<()> {
        let conn = self.conn()?;

        let patient_id: i64 = match patient.id() {
            Some(id) => {
                let updated = conn
                    .execute(
                        "UPDATE patients SET name = $1, ssn = $2 WHERE id = $3",
                        &[&patient.name(), &patient.ssn().as_str(), &id.get()],
                    )
                    .await
                    .map_err(|e| write_error("Failed to update patient", e))?;
                if updated == 0 {
                    return Err(WardError::Database(format!("Patient {id} does not exist")));
                }
                id.get()
            }
            None => {
                let row = conn
                    .query_one(
                        "INSERT INTO patients (name, ssn) VALUES ($1, $2) RETURNING id",
                        &[&patient.name(), &patient.ssn().as_str()],
                    )
                    .await
                    .map_err(|e| {
                        if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                            WardError::Conflict(format!(
                                "Patient with SSN {} already exists",
                                patient.ssn()
                            ))
                        } else {
                            WardError::Database(format!("Failed to insert patient: {}", e))
                        }
                    })?;
                row.try_get(0)
                    .map_err(|e| WardError::Database(format!("Failed to read patient id: {}", e)))?
            }
        };

        let mut current: Vec<i64> = Vec::with_capacity(patient.appointments().len());
        let mut inserted = 0usize;
        for appointment in patient.appointments_mut() {
            if let Some(id) = appointment.id() {
                // Appointments are immutable once stored
                current.push(id.get());
                continue;
            }

            let row = conn
                .query_one(
                    "INSERT INTO appointments (reason, appointment_date, patient_id) \
                     VALUES ($1, $2, $3) RETURNING id",
                    &[
                        &appointment.reason(),
                        &appointment.appointment_date(),
                        &patient_id,
                    ],
                )
                .await
                .map_err(|e| write_error("Failed to insert appointment", e))?;
            let id: i64 = row
                .try_get(0)
                .map_err(|e| WardError::Database(format!("Failed to read appointment id: {}", e)))?;
            appointment.assign_id(AppointmentId::new(id));
            current.push(id);
            inserted += 1;
        }

        let detached = detached_ids(
            self.loaded.get(&patient_id).map(Vec::as_slice).unwrap_or(&[]),
            &current,
        );
        let removed = if detached.is_empty() {
            0
        } else {
            conn.execute(
                "DELETE FROM appointments WHERE patient_id = $1 AND id = ANY($2)",
                &[&patient_id, &detached],
            )
            .await
            .map_err(|e| write_error("Failed to remove detached appointments", e))?
        };

        tracing::debug!(patient_id, inserted, removed, "Saved patient");

        self.loaded.insert(patient_id, current);
        patient.assign_id(PatientId::new(patient_id));
        Ok(())
    }

    async fn find_appointments_by_reason_ignore_case(
        &mut self,
        reason: &str,
    ) -> Result<Vec<Appointment>> {
        self.appointments_where("LOWER(a.reason) = LOWER($1) ORDER BY a.id", &[&reason])
            .await
    }

    async fn find_appointments_by_reason_containing_ignore_case(
        &mut self,
        keyword: &str,
    ) -> Result<Vec<Appointment>> {
        self.appointments_where(
            "strpos(LOWER(a.reason), LOWER($1)) > 0 ORDER BY a.id",
            &[&keyword],
        )
        .await
    }

    async fn find_appointments_by_patient_ssn(&mut self, ssn: &str) -> Result<Vec<Appointment>> {
        self.appointments_where("p.ssn = $1 ORDER BY a.id", &[&ssn])
            .await
    }

    async fn delete_appointments_by_patient_ssn(&mut self, ssn: &str) -> Result<u64> {
        self.conn()?
            .execute(
                "DELETE FROM appointments a USING patients p \
                 WHERE a.patient_id = p.id AND p.ssn = $1",
                &[&ssn],
            )
            .await
            .map_err(|e| WardError::Database(format!("Failed to delete appointments: {}", e)))
    }

    async fn find_earliest_appointments_by_patient_ssn(
        &mut self,
        ssn: &str,
        limit: usize,
    ) -> Result<Vec<Appointment>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.appointments_where(
            "p.ssn = $1 ORDER BY a.appointment_date ASC, a.id ASC LIMIT $2",
            &[&ssn, &limit],
        )
        .await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.finish("COMMIT").await?;
        tracing::trace!("PostgreSQL transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let mut this = self;
        this.finish("ROLLBACK").await?;
        tracing::trace!("PostgreSQL transaction rolled back");
        Ok(())
    }
}

impl Drop for PostgreSQLTransaction {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!("PostgreSQL transaction dropped without commit; discarding connection");
            drop(Object::take(conn));
        }
    }
}
