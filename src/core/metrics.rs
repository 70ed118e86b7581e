//! Operation counters for the hospital service
//!
//! The service depends only on the narrow [`MetricsRecorder`] trait. The
//! production implementation, [`HospitalMetrics`], owns its own Prometheus
//! registry; nothing is registered globally, so every service instance (and
//! every test) sees isolated counters.

use crate::domain::{Result, WardError};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::collections::BTreeMap;

/// Kind of read query, used as the `type` tag on the query counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Case-insensitive exact reason match
    ByExactReason,
    /// Case-insensitive substring reason match
    ContainingReason,
    /// Latest appointment for an SSN
    LatestBySsn,
}

impl QueryKind {
    /// Every query kind, in tag order
    pub const ALL: [QueryKind; 3] = [
        QueryKind::ByExactReason,
        QueryKind::ContainingReason,
        QueryKind::LatestBySsn,
    ];

    /// Tag value recorded with the query counter
    pub fn as_tag(self) -> &'static str {
        match self {
            QueryKind::ByExactReason => "by_exact_reason",
            QueryKind::ContainingReason => "containing_reason",
            QueryKind::LatestBySsn => "latest_by_ssn",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Sink for hospital operation events
///
/// Recording never fails: implementations swallow their own problems so a
/// committed business operation is never turned into an error.
pub trait MetricsRecorder: Send + Sync {
    /// Appointments were created
    fn record_created(&self, count: u64);

    /// A read query ran
    fn record_queried(&self, kind: QueryKind);

    /// Appointments were deleted
    fn record_deleted(&self, count: u64);
}

/// Recorder that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    fn record_created(&self, _count: u64) {}
    fn record_queried(&self, _kind: QueryKind) {}
    fn record_deleted(&self, _count: u64) {}
}

/// Prometheus-backed recorder
#[derive(Clone)]
pub struct HospitalMetrics {
    registry: Registry,
    created: IntCounter,
    queried: IntCounter,
    deleted: IntCounter,
    query_count: IntCounterVec,
    last_deletion_size: IntGauge,
}

impl HospitalMetrics {
    /// Creates the counters in a fresh registry
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be created or registered.
    pub fn new() -> Result<Self> {
        Self::with_registry(Registry::new())
    }

    /// Creates the counters in the given registry
    ///
    /// # Errors
    ///
    /// Returns an error if a metric cannot be created or registered
    /// (for instance when the registry already holds them).
    pub fn with_registry(registry: Registry) -> Result<Self> {
        let created = IntCounter::with_opts(Opts::new(
            "hospital_appointments_created_total",
            "Number of appointments created",
        ))
        .map_err(metrics_error)?;
        let queried = IntCounter::with_opts(Opts::new(
            "hospital_appointments_queried_total",
            "Number of appointment queries",
        ))
        .map_err(metrics_error)?;
        let deleted = IntCounter::with_opts(Opts::new(
            "hospital_appointments_deleted_total",
            "Number of appointments deleted",
        ))
        .map_err(metrics_error)?;
        let query_count = IntCounterVec::new(
            Opts::new(
                "hospital_appointments_query_count_total",
                "Appointment queries by query type",
            ),
            &["type"],
        )
        .map_err(metrics_error)?;
        let last_deletion_size = IntGauge::with_opts(Opts::new(
            "hospital_appointments_last_deletion_size",
            "Number of appointments removed by the most recent deletion",
        ))
        .map_err(metrics_error)?;

        registry
            .register(Box::new(created.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(queried.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(deleted.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(query_count.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(last_deletion_size.clone()))
            .map_err(metrics_error)?;

        // Pre-create each tagged series so snapshots always list every kind
        for kind in QueryKind::ALL {
            query_count.with_label_values(&[kind.as_tag()]);
        }

        Ok(Self {
            registry,
            created,
            queried,
            deleted,
            query_count,
            last_deletion_size,
        })
    }

    /// The registry holding these metrics
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Counter values keyed by their dotted names
    ///
    /// Tagged series are keyed as `name{type=<tag>}`.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        let mut counters = BTreeMap::new();
        counters.insert(
            "hospital.appointments.created".to_string(),
            self.created.get() as f64,
        );
        counters.insert(
            "hospital.appointments.queried".to_string(),
            self.queried.get() as f64,
        );
        counters.insert(
            "hospital.appointments.deleted".to_string(),
            self.deleted.get() as f64,
        );
        for kind in QueryKind::ALL {
            counters.insert(
                format!("hospital.appointments.query.count{{type={}}}", kind.as_tag()),
                self.query_count.with_label_values(&[kind.as_tag()]).get() as f64,
            );
        }
        counters
    }

    /// Size of the most recent non-empty deletion
    pub fn last_deletion_size(&self) -> i64 {
        self.last_deletion_size.get()
    }

    /// Renders every metric in the Prometheus text exposition format
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer)
            .map_err(|e| WardError::Serialization(format!("Metrics output is not UTF-8: {e}")))
    }
}

impl MetricsRecorder for HospitalMetrics {
    fn record_created(&self, count: u64) {
        self.created.inc_by(count);
    }

    fn record_queried(&self, kind: QueryKind) {
        self.queried.inc();
        self.query_count.with_label_values(&[kind.as_tag()]).inc();
    }

    fn record_deleted(&self, count: u64) {
        self.deleted.inc_by(count);
        self.last_deletion_size
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }
}

fn metrics_error(err: prometheus::Error) -> WardError {
    WardError::Other(format!("Metrics error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = HospitalMetrics::new().unwrap();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.len(), 6);
        assert!(snapshot.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_record_events() {
        let metrics = HospitalMetrics::new().unwrap();
        metrics.record_created(2);
        metrics.record_created(3);
        metrics.record_queried(QueryKind::ByExactReason);
        metrics.record_queried(QueryKind::LatestBySsn);
        metrics.record_queried(QueryKind::LatestBySsn);
        metrics.record_deleted(4);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot["hospital.appointments.created"], 5.0);
        assert_eq!(snapshot["hospital.appointments.queried"], 3.0);
        assert_eq!(snapshot["hospital.appointments.deleted"], 4.0);
        assert_eq!(
            snapshot["hospital.appointments.query.count{type=latest_by_ssn}"],
            2.0
        );
        assert_eq!(
            snapshot["hospital.appointments.query.count{type=by_exact_reason}"],
            1.0
        );
        assert_eq!(
            snapshot["hospital.appointments.query.count{type=containing_reason}"],
            0.0
        );
        assert_eq!(metrics.last_deletion_size(), 4);
    }

    #[test]
    fn test_instances_are_isolated() {
        let first = HospitalMetrics::new().unwrap();
        let second = HospitalMetrics::new().unwrap();
        first.record_created(1);
        assert_eq!(second.snapshot()["hospital.appointments.created"], 0.0);
    }

    #[test]
    fn test_registering_twice_in_one_registry_fails() {
        let registry = Registry::new();
        assert!(HospitalMetrics::with_registry(registry.clone()).is_ok());
        assert!(HospitalMetrics::with_registry(registry).is_err());
    }

    #[test]
    fn test_render_text_format() {
        let metrics = HospitalMetrics::new().unwrap();
        metrics.record_queried(QueryKind::ContainingReason);
        let text = metrics.render().unwrap();
        assert!(text.contains("hospital_appointments_queried_total 1"));
        assert!(text.contains("type=\"containing_reason\""));
    }

    #[test]
    fn test_query_kind_tags() {
        assert_eq!(QueryKind::ByExactReason.as_tag(), "by_exact_reason");
        assert_eq!(QueryKind::ContainingReason.to_string(), "containing_reason");
        assert_eq!(QueryKind::LatestBySsn.as_tag(), "latest_by_ssn");
    }

    #[test]
    fn test_noop_metrics_accepts_events() {
        let metrics = NoopMetrics;
        metrics.record_created(1);
        metrics.record_queried(QueryKind::LatestBySsn);
        metrics.record_deleted(1);
    }
}
