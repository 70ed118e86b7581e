//! Configuration management for Ward.
//!
//! Ward reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `WARD_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! store_backend = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [server]
//! bind_address = "0.0.0.0:8080"
//!
//! [postgresql]
//! connection_string = "${WARD_PG_CONNECTION_STRING}"
//! max_connections = 10
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/ward"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use ward::config::load_config;
//!
//! match load_config("ward.toml") {
//!     Ok(config) => println!("Store backend: {}", config.store_backend),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, LoggingConfig, PostgreSQLConfig, ServerConfig, StoreBackend, WardConfig,
};
pub use secret::{mask_url_password, secret_string, SecretString, SecretValue};
