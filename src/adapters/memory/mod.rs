//! In-memory store backend
//!
//! Used for local development, demos and tests. Contents are lost when the
//! process exits.

pub mod store;

pub use store::{MemoryStore, MemoryTransaction};
