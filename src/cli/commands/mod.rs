//! CLI command implementations
//!
//! Every command returns a process exit code: 0 on success, 2 for
//! configuration errors, 4 when the store cannot be reached and 5 for any
//! other fatal error.

pub mod init;
pub mod migrate;
pub mod serve;
pub mod validate;

/// Command finished successfully
pub const EXIT_OK: i32 = 0;

/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Store backend is unreachable
pub const EXIT_CONNECTION_ERROR: i32 = 4;

/// Any other fatal error
pub const EXIT_FATAL: i32 = 5;
