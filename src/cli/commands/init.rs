//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::commands::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ward.toml")]
    pub output: String,

    /// Include every option with explanatory comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Ward configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set store_backend to 'memory' or 'postgresql'");
                println!("  3. For PostgreSQL, export WARD_PG_CONNECTION_STRING (or use a .env file)");
                println!("  4. Validate configuration: ward validate-config");
                println!("  5. Start the API: ward serve");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Ward Configuration File
# Hospital patient and appointment service

# Store backend: memory | postgresql
store_backend = "memory"

[application]
log_level = "info"

[server]
bind_address = "0.0.0.0:8080"

# [postgresql]
# connection_string = "${WARD_PG_CONNECTION_STRING}"

[logging]
local_enabled = true
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with every option documented
    fn generate_config_with_examples() -> String {
        r#"# Ward Configuration File
# Hospital patient and appointment service
#
# Any value can be overridden with WARD_<SECTION>_<KEY>, for example
# WARD_SERVER_BIND_ADDRESS or WARD_POSTGRESQL_MAX_CONNECTIONS.
# ${VAR} placeholders are replaced from the environment at load time.

# ============================================================================
# Store backend
# ============================================================================
# memory     - in-process, contents are lost on exit (development and demos)
# postgresql - durable storage, requires the [postgresql] section
store_backend = "memory"

# ============================================================================
# Application Configuration
# ============================================================================
[application]
# Log level: trace | debug | info | warn | error
# RUST_LOG takes precedence when set
log_level = "info"

# ============================================================================
# HTTP Server Configuration
# ============================================================================
[server]
# Address and port to listen on
bind_address = "0.0.0.0:8080"

# Seconds to let in-flight requests finish after SIGINT/SIGTERM
shutdown_timeout_secs = 30

# Serve Swagger UI at /swagger-ui and the document at /api-docs/openapi.json
enable_swagger = true

# ============================================================================
# PostgreSQL Configuration
# ============================================================================
# Uncomment this section if using PostgreSQL (store_backend = "postgresql")
#
# [postgresql]
# # Connection string format: postgresql://[user[:password]@][host][:port][/dbname]
# connection_string = "${WARD_PG_CONNECTION_STRING}"
#
# # Connection pool settings
# max_connections = 10                # Maximum connections in pool (1-100)
# connection_timeout_seconds = 30     # Timeout for acquiring a connection
# statement_timeout_seconds = 60      # Timeout for each SQL statement
#
# # SSL mode: disable | allow | prefer | require | verify-ca | verify-full
# ssl_mode = "disable"
#
# # Create tables and indexes on startup (or run `ward migrate`)
# run_migrations = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = true

# Directory for ward.log files
local_path = "/var/log/ward"

# Log rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
