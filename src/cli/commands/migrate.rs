//! Migrate command implementation
//!
//! This module implements the `migrate` command, which applies the bundled
//! PostgreSQL schema without starting the server.

use crate::adapters::postgresql::PostgreSQLClient;
use crate::cli::commands::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the migrate command
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting migrate command");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let Some(pg_config) = config.postgresql else {
            eprintln!("❌ No [postgresql] section in {config_path}; nothing to migrate");
            return Ok(EXIT_CONFIG_ERROR);
        };

        let client = match PostgreSQLClient::new(pg_config) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("❌ Invalid PostgreSQL settings: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("🔌 Connecting to {}", client.connection_string_safe());
        if let Err(e) = client.test_connection().await {
            crate::log_error_with_context!(&e, "PostgreSQL connection test failed");
            eprintln!("❌ Cannot reach PostgreSQL: {e}");
            return Ok(EXIT_CONNECTION_ERROR);
        }

        match client.ensure_schema().await {
            Ok(()) => {
                println!("✅ Schema is up to date");
                Ok(EXIT_OK)
            }
            Err(e) => {
                crate::log_error_with_context!(&e, "Schema migration failed");
                eprintln!("❌ Schema migration failed: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::TEST_ENV_LOCK;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_memory_only_config_has_nothing_to_migrate() {
        let _env = TEST_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "store_backend = \"memory\"").unwrap();

        let code = MigrateArgs::default()
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
