//! PostgreSQL store backend
//!
//! This module provides the pooled client and the transactional store
//! implementation used when `store_backend = "postgresql"`.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::{PostgreSQLStore, PostgreSQLTransaction};
pub use client::PostgreSQLClient;
