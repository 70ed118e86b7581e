//! Store factory
//!
//! This module provides the factory function that creates the configured
//! store backend.

use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::adapter::PostgreSQLStore;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::store::traits::HospitalStore;
use crate::config::schema::{StoreBackend, WardConfig};
use crate::domain::{Result, WardError};
use std::sync::Arc;

/// Create a store based on the configuration
///
/// This factory function examines `store_backend` in the configuration and
/// creates the matching implementation. For PostgreSQL the connection is
/// tested and, when `run_migrations` is set, the schema is applied.
///
/// # Arguments
///
/// * `config` - The Ward configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements HospitalStore
///
/// # Errors
///
/// Returns an error if the store cannot be created or reached
pub async fn create_store(config: &WardConfig) -> Result<Arc<dyn HospitalStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Creating in-memory store");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn HospitalStore>)
        }
        StoreBackend::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                WardError::Configuration(
                    "postgresql configuration is required when store_backend = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL store");
            let client = PostgreSQLClient::new(pg_config.clone())?;
            client.test_connection().await?;
            if pg_config.run_migrations {
                client.ensure_schema().await?;
            }

            Ok(Arc::new(PostgreSQLStore::new(client)) as Arc<dyn HospitalStore>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_store() {
        let config = WardConfig::default();
        let store = create_store(&config).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.test_connection().await.is_ok());
    }

    #[tokio::test]
    async fn test_postgresql_without_section_is_configuration_error() {
        let config = WardConfig {
            store_backend: StoreBackend::PostgreSQL,
            ..WardConfig::default()
        };
        let err = create_store(&config).await.err().unwrap();
        assert!(matches!(err, WardError::Configuration(_)));
    }
}
