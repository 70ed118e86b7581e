//! Application state for the API server

use crate::core::hospital::HospitalService;
use crate::core::metrics::HospitalMetrics;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Hospital service
    pub service: HospitalService,
    /// Counters exposed on the metrics endpoints
    pub metrics: HospitalMetrics,
}

impl AppState {
    /// Create new application state
    pub fn new(service: HospitalService, metrics: HospitalMetrics) -> Self {
        Self { service, metrics }
    }
}
