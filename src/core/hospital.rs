//! Hospital service - business rules for patients and appointments
//!
//! Every public operation runs inside exactly one store transaction. The
//! transaction is committed when the operation succeeds and rolled back when
//! it fails; metric events are emitted only after a successful commit.

use crate::adapters::store::{HospitalStore, StoreTransaction};
use crate::core::metrics::{MetricsRecorder, QueryKind};
use crate::domain::{parse_appointment_date, Appointment, Patient, Result, Ssn, WardError};
use std::sync::Arc;
use std::time::Instant;

/// Hospital service
///
/// Cheap to clone; clones share the store and the metrics recorder.
#[derive(Clone)]
pub struct HospitalService {
    store: Arc<dyn HospitalStore>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl HospitalService {
    /// Create a new hospital service
    ///
    /// # Arguments
    ///
    /// * `store` - Store backend every operation runs against
    /// * `metrics` - Recorder receiving created/queried/deleted events
    pub fn new(store: Arc<dyn HospitalStore>, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { store, metrics }
    }

    /// Get the store backend
    pub fn store(&self) -> &Arc<dyn HospitalStore> {
        &self.store
    }

    /// Create appointments for a patient from parallel reason/date lists
    ///
    /// The patient is looked up by SSN and created when unknown; for an
    /// existing patient `patient_name` is ignored. Entries are paired up to
    /// the length of the shorter list.
    ///
    /// The whole call is atomic: a bad date rolls back every appointment of
    /// the call and, for a previously unknown SSN, the new patient too.
    ///
    /// # Returns
    ///
    /// The created appointments in index order, with ids assigned.
    ///
    /// # Errors
    ///
    /// * `WardError::InvalidInput` - empty lists, malformed SSN, blank name or
    ///   reason, or a date that does not parse
    /// * `WardError::Conflict` - a concurrent call created the same patient
    pub async fn bulk_create_appointments(
        &self,
        patient_name: &str,
        ssn: &str,
        reasons: &[String],
        dates: &[String],
    ) -> Result<Vec<Appointment>> {
        if reasons.is_empty() || dates.is_empty() {
            return Err(WardError::InvalidInput(
                "Reasons and dates lists cannot be empty".to_string(),
            ));
        }

        let started = Instant::now();
        crate::log_operation_start!("bulk_create_appointments", ssn);

        let mut tx = self.store.begin().await?;
        let result = bulk_create_in(tx.as_mut(), patient_name, ssn, reasons, dates).await;
        let created = finish(tx, result, "bulk_create_appointments").await?;

        self.metrics.record_created(created.len() as u64);
        crate::log_operation_complete!("bulk_create_appointments", created.len(), started.elapsed());
        Ok(created)
    }

    /// Find a patient (with appointments) by SSN
    ///
    /// # Errors
    ///
    /// Returns `WardError::NotFound` if no patient has that SSN.
    pub async fn find_patient_by_ssn(&self, ssn: &str) -> Result<Patient> {
        let mut tx = self.store.begin().await?;
        let result = match tx.find_patient_by_ssn(ssn).await {
            Ok(Some(patient)) => Ok(patient),
            Ok(None) => Err(WardError::patient_not_found(ssn)),
            Err(e) => Err(e),
        };
        finish(tx, result, "find_patient_by_ssn").await
    }

    /// Appointments whose reason equals `reason`, ignoring case
    pub async fn get_appointments_by_reason(&self, reason: &str) -> Result<Vec<Appointment>> {
        let mut tx = self.store.begin().await?;
        let result = tx.find_appointments_by_reason_ignore_case(reason).await;
        let appointments = finish(tx, result, "get_appointments_by_reason").await?;

        self.metrics.record_queried(QueryKind::ByExactReason);
        tracing::debug!(reason, count = appointments.len(), "Exact reason query");
        Ok(appointments)
    }

    /// Appointments whose reason contains `keyword`, ignoring case
    pub async fn get_appointments_containing_reason(
        &self,
        keyword: &str,
    ) -> Result<Vec<Appointment>> {
        let mut tx = self.store.begin().await?;
        let result = tx
            .find_appointments_by_reason_containing_ignore_case(keyword)
            .await;
        let appointments = finish(tx, result, "get_appointments_containing_reason").await?;

        self.metrics.record_queried(QueryKind::ContainingReason);
        tracing::debug!(keyword, count = appointments.len(), "Reason substring query");
        Ok(appointments)
    }

    /// Delete every appointment of the patient with the given SSN
    ///
    /// The patient record itself is kept.
    ///
    /// # Returns
    ///
    /// The number of deleted appointments.
    ///
    /// # Errors
    ///
    /// Returns `WardError::NotFound` if no patient has that SSN.
    pub async fn delete_appointments_by_ssn(&self, ssn: &str) -> Result<u64> {
        let started = Instant::now();
        crate::log_operation_start!("delete_appointments_by_ssn", ssn);

        let mut tx = self.store.begin().await?;
        let result = delete_in(tx.as_mut(), ssn).await;
        let deleted = finish(tx, result, "delete_appointments_by_ssn").await?;

        if deleted > 0 {
            self.metrics.record_deleted(deleted);
        }
        crate::log_operation_complete!("delete_appointments_by_ssn", deleted, started.elapsed());
        Ok(deleted)
    }

    /// Appointment that sorts first by date for the given SSN
    ///
    /// Appointments are ordered by date ascending and the first one is
    /// returned, so this yields the patient's earliest appointment.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the patient exists but has no appointments.
    ///
    /// # Errors
    ///
    /// Returns `WardError::NotFound` if no patient has that SSN.
    pub async fn find_latest_appointment_by_ssn(&self, ssn: &str) -> Result<Option<Appointment>> {
        let mut tx = self.store.begin().await?;
        let result = latest_in(tx.as_mut(), ssn).await;
        let appointment = finish(tx, result, "find_latest_appointment_by_ssn").await?;

        self.metrics.record_queried(QueryKind::LatestBySsn);
        Ok(appointment)
    }
}

async fn bulk_create_in(
    tx: &mut dyn StoreTransaction,
    patient_name: &str,
    ssn: &str,
    reasons: &[String],
    dates: &[String],
) -> Result<Vec<Appointment>> {
    let mut patient = match tx.find_patient_by_ssn(ssn).await? {
        Some(patient) => {
            tracing::info!(ssn, "Using existing patient");
            patient
        }
        None => {
            tracing::info!(ssn, "Creating new patient");
            let ssn = Ssn::new(ssn).map_err(WardError::InvalidInput)?;
            let mut patient = Patient::new(patient_name, ssn).map_err(WardError::InvalidInput)?;
            tx.save_patient(&mut patient).await?;
            patient
        }
    };

    let first_new = patient.appointments().len();
    for (index, (reason, raw_date)) in reasons.iter().zip(dates).enumerate() {
        let appointment_date = parse_appointment_date(raw_date).ok_or_else(|| {
            WardError::InvalidInput(format!("Invalid date format at index {index}: {raw_date}"))
        })?;
        let appointment =
            Appointment::new(reason.as_str(), appointment_date).map_err(WardError::InvalidInput)?;
        tracing::debug!(index, reason = %reason, date = %appointment_date, "Adding appointment");
        patient.add_appointment(appointment);
    }

    tx.save_patient(&mut patient).await?;

    let created = patient.appointments()[first_new..].to_vec();
    tracing::info!(ssn, count = created.len(), "Appointments created");
    Ok(created)
}

async fn delete_in(tx: &mut dyn StoreTransaction, ssn: &str) -> Result<u64> {
    if !tx.exists_patient_by_ssn(ssn).await? {
        return Err(WardError::patient_not_found(ssn));
    }
    tx.delete_appointments_by_patient_ssn(ssn).await
}

async fn latest_in(tx: &mut dyn StoreTransaction, ssn: &str) -> Result<Option<Appointment>> {
    if !tx.exists_patient_by_ssn(ssn).await? {
        return Err(WardError::patient_not_found(ssn));
    }
    Ok(tx
        .find_earliest_appointments_by_patient_ssn(ssn, 1)
        .await?
        .into_iter()
        .next())
}

/// Commit on success, roll back on failure
///
/// A failed rollback is logged and the original error is returned.
async fn finish<T>(
    tx: Box<dyn StoreTransaction>,
    result: Result<T>,
    operation: &'static str,
) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(|e| {
                crate::log_error_with_context!(&e, operation);
                e
            })?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                tracing::warn!(
                    operation,
                    error = %rollback_error,
                    "Rollback failed"
                );
            }
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMetrics {
        events: Mutex<Vec<String>>,
    }

    impl RecordingMetrics {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl MetricsRecorder for RecordingMetrics {
        fn record_created(&self, count: u64) {
            self.events.lock().unwrap().push(format!("created:{count}"));
        }

        fn record_queried(&self, kind: QueryKind) {
            self.events.lock().unwrap().push(format!("queried:{kind}"));
        }

        fn record_deleted(&self, count: u64) {
            self.events.lock().unwrap().push(format!("deleted:{count}"));
        }
    }

    /// Store whose commits always fail, wrapping a working memory store
    struct FailingCommitStore {
        inner: MemoryStore,
    }

    struct FailingCommitTransaction {
        inner: Box<dyn StoreTransaction>,
    }

    #[async_trait]
    impl HospitalStore for FailingCommitStore {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn ensure_schema(&self) -> Result<()> {
            Ok(())
        }

        async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
            Ok(Box::new(FailingCommitTransaction {
                inner: self.inner.begin().await?,
            }))
        }
    }

    #[async_trait]
    impl StoreTransaction for FailingCommitTransaction {
        async fn find_patient_by_ssn(&mut self, ssn: &str) -> Result<Option<Patient>> {
            self.inner.find_patient_by_ssn(ssn).await
        }

        async fn exists_patient_by_ssn(&mut self, ssn: &str) -> Result<bool> {
            self.inner.exists_patient_by_ssn(ssn).await
        }

        async fn save_patient(&mut self, patient: &mut Patient) -> Result<()> {
            self.inner.save_patient(patient).await
        }

        async fn find_appointments_by_reason_ignore_case(
            &mut self,
            reason: &str,
        ) -> Result<Vec<Appointment>> {
            self.inner.find_appointments_by_reason_ignore_case(reason).await
        }

        async fn find_appointments_by_reason_containing_ignore_case(
            &mut self,
            keyword: &str,
        ) -> Result<Vec<Appointment>> {
            self.inner
                .find_appointments_by_reason_containing_ignore_case(keyword)
                .await
        }

        async fn find_appointments_by_patient_ssn(
            &mut self,
            ssn: &str,
        ) -> Result<Vec<Appointment>> {
            self.inner.find_appointments_by_patient_ssn(ssn).await
        }

        async fn delete_appointments_by_patient_ssn(&mut self, ssn: &str) -> Result<u64> {
            self.inner.delete_appointments_by_patient_ssn(ssn).await
        }

        async fn find_earliest_appointments_by_patient_ssn(
            &mut self,
            ssn: &str,
            limit: usize,
        ) -> Result<Vec<Appointment>> {
            self.inner
                .find_earliest_appointments_by_patient_ssn(ssn, limit)
                .await
        }

        async fn commit(self: Box<Self>) -> Result<()> {
            self.inner.rollback().await?;
            Err(WardError::Database("commit refused".to_string()))
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            self.inner.rollback().await
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn service_with(metrics: Arc<RecordingMetrics>) -> HospitalService {
        HospitalService::new(Arc::new(MemoryStore::new()), metrics)
    }

    #[tokio::test]
    async fn test_metrics_follow_each_operation() {
        let metrics = Arc::new(RecordingMetrics::default());
        let service = service_with(metrics.clone());

        service
            .bulk_create_appointments(
                "Jane Doe",
                "123-22-4567",
                &strings(&["Checkup", "Follow-up"]),
                &strings(&["2030-01-01T09:00:00", "2030-02-01T09:00:00"]),
            )
            .await
            .unwrap();
        service.get_appointments_by_reason("checkup").await.unwrap();
        service
            .get_appointments_containing_reason("follow")
            .await
            .unwrap();
        service.delete_appointments_by_ssn("123-22-4567").await.unwrap();
        service
            .find_latest_appointment_by_ssn("123-22-4567")
            .await
            .unwrap();
        // Nothing left to delete: no event.
        service.delete_appointments_by_ssn("123-22-4567").await.unwrap();

        assert_eq!(
            metrics.events(),
            vec![
                "created:2",
                "queried:by_exact_reason",
                "queried:containing_reason",
                "deleted:2",
                "queried:latest_by_ssn",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_operations_emit_no_metrics() {
        let metrics = Arc::new(RecordingMetrics::default());
        let service = service_with(metrics.clone());

        let err = service
            .bulk_create_appointments(
                "Jane Doe",
                "123-22-4567",
                &strings(&["Checkup"]),
                &strings(&["not-a-date"]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WardError::InvalidInput(_)));

        let err = service
            .find_latest_appointment_by_ssn("999-99-9999")
            .await
            .unwrap_err();
        assert!(matches!(err, WardError::NotFound(_)));

        assert!(metrics.events().is_empty());
    }

    #[tokio::test]
    async fn test_commit_failure_surfaces_and_skips_metrics() {
        let metrics = Arc::new(RecordingMetrics::default());
        let service = HospitalService::new(
            Arc::new(FailingCommitStore {
                inner: MemoryStore::new(),
            }),
            metrics.clone(),
        );

        let err = service
            .bulk_create_appointments(
                "Jane Doe",
                "123-22-4567",
                &strings(&["Checkup"]),
                &strings(&["2030-01-01T09:00:00"]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WardError::Database(_)));
        assert!(metrics.events().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_ssn_for_new_patient() {
        let service = service_with(Arc::new(RecordingMetrics::default()));
        let err = service
            .bulk_create_appointments(
                "Jane Doe",
                "123456789",
                &strings(&["Checkup"]),
                &strings(&["2030-01-01T09:00:00"]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "SSN must be in format XXX-XX-XXXX");
    }

    #[tokio::test]
    async fn test_existing_patient_keeps_its_name() {
        let service = service_with(Arc::new(RecordingMetrics::default()));
        let reasons = strings(&["Checkup"]);
        let dates = strings(&["2030-01-01T09:00:00"]);

        service
            .bulk_create_appointments("Jane Doe", "123-22-4567", &reasons, &dates)
            .await
            .unwrap();
        let created = service
            .bulk_create_appointments("Someone Else", "123-22-4567", &reasons, &dates)
            .await
            .unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].patient().unwrap().name, "Jane Doe");
        let patient = service.find_patient_by_ssn("123-22-4567").await.unwrap();
        assert_eq!(patient.name(), "Jane Doe");
        assert_eq!(patient.appointments().len(), 2);
    }
}
