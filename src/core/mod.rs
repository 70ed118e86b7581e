//! Core business logic for Ward.
//!
//! # Modules
//!
//! - [`hospital`] - The hospital service: bulk appointment creation, patient
//!   lookup, reason queries, deletion and latest-appointment lookup
//! - [`metrics`] - Operation counters consumed by the service
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ward::adapters::memory::MemoryStore;
//! use ward::core::hospital::HospitalService;
//! use ward::core::metrics::HospitalMetrics;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = HospitalMetrics::new()?;
//! let service = HospitalService::new(Arc::new(MemoryStore::new()), Arc::new(metrics.clone()));
//!
//! let created = service
//!     .bulk_create_appointments(
//!         "Jane Doe",
//!         "123-22-4567",
//!         &["Checkup".to_string()],
//!         &["2030-01-01T09:00:00".to_string()],
//!     )
//!     .await?;
//!
//! println!("Created {} appointments", created.len());
//! println!("{}", metrics.render()?);
//! # Ok(())
//! # }
//! ```

pub mod hospital;
pub mod metrics;

pub use hospital::HospitalService;
pub use metrics::{HospitalMetrics, MetricsRecorder, NoopMetrics, QueryKind};
