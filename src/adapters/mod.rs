//! Storage backends for Ward.
//!
//! - [`store`] - Store abstraction (traits and factory)
//! - [`memory`] - In-process backend for development and tests
//! - [`postgresql`] - PostgreSQL backend
//!
//! Services only ever see the [`store::HospitalStore`] trait, so backends can
//! be swapped through configuration:
//!
//! ```rust,no_run
//! use ward::adapters::store::create_store;
//! use ward::config::WardConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = create_store(&WardConfig::default()).await?;
//! let tx = store.begin().await?;
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod postgresql;
pub mod store;
