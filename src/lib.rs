// Ward - Hospital Patient and Appointment Service
// Copyright (c) 2025 Ward Contributors
// Licensed under the MIT License

//! # Ward - Hospital Patient and Appointment Service
//!
//! Ward keeps patients and their appointments and exposes them over a JSON
//! HTTP API backed by PostgreSQL or an in-process store.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Bulk creation** of appointments for a patient identified by SSN
//! - **Lookups** of patients and of appointments by reason (exact or substring)
//! - **Deletion** of every appointment of a patient
//! - **Counting** each operation in a Prometheus registry
//!
//! ## Architecture
//!
//! Ward follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`api`] - HTTP routes, request validation and response envelope
//! - [`core`] - Business logic (hospital service, metrics)
//! - [`adapters`] - Store backends (PostgreSQL, in-memory)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ward::adapters::store::create_store;
//! use ward::config::load_config;
//! use ward::core::{HospitalMetrics, HospitalService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("ward.toml")?;
//!     let store = create_store(&config).await?;
//!     let metrics = HospitalMetrics::new()?;
//!     let service = HospitalService::new(store, Arc::new(metrics));
//!
//!     let patient = service.find_patient_by_ssn("123-22-4567").await?;
//!     println!("{} has {} appointments", patient.name(), patient.appointments().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Ward uses the [`domain::WardError`] type for all errors. Its
//! [`kind`](domain::WardError::kind) tells business failures (invalid input,
//! not found, conflict) apart from unexpected ones:
//!
//! ```rust
//! use ward::domain::{ErrorKind, WardError};
//!
//! let error = WardError::patient_not_found("000-00-0000");
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//! assert_eq!(error.to_string(), "Patient not found with SSN: 000-00-0000");
//! ```
//!
//! ## Logging
//!
//! Ward uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(ssn = "123-22-4567", "Creating new patient");
//! tracing::warn!(operation = "delete_appointments_by_ssn", "Rollback failed");
//! ```

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
