//! HTTP API
//!
//! axum routes over the hospital service. Every JSON endpoint answers with the
//! `{"success", "message", "data"}` envelope; errors are mapped to status codes
//! in [`error`].

pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use routes::{router, ApiDoc};
pub use state::AppState;
