//! Store abstraction layer
//!
//! This module provides a trait-based abstraction over patient and appointment
//! storage, allowing Ward to run against PostgreSQL or an in-memory backend.

pub mod factory;
pub mod traits;

pub use factory::create_store;
pub use traits::{HospitalStore, StoreTransaction};
