//! Serve command implementation
//!
//! This module implements the `serve` command, which runs the HTTP API until
//! a shutdown signal arrives.

use crate::adapters::store::create_store;
use crate::api::{router, AppState};
use crate::cli::commands::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL, EXIT_OK};
use crate::config::load_config;
use crate::core::hospital::HospitalService;
use crate::core::metrics::HospitalMetrics;
use clap::Args;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override `server.bind_address`
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting serve command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Some(bind) = &self.bind {
            tracing::info!(bind = %bind, "Overriding bind address from CLI");
            config.server.bind_address = bind.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let store = match create_store(&config).await {
            Ok(store) => store,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to initialize store");
                eprintln!("Failed to initialize store: {e}");
                return Ok(EXIT_CONNECTION_ERROR);
            }
        };

        let metrics = HospitalMetrics::new()?;
        let service = HospitalService::new(store, Arc::new(metrics.clone()));
        let app = router(
            AppState::new(service, metrics),
            config.server.enable_swagger,
        );

        let listener = match TcpListener::bind(&config.server.bind_address).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    address = %config.server.bind_address,
                    "Failed to bind listener"
                );
                eprintln!("Failed to bind {}: {e}", config.server.bind_address);
                return Ok(EXIT_FATAL);
            }
        };

        tracing::info!(
            address = %config.server.bind_address,
            store = %config.store_backend,
            swagger = config.server.enable_swagger,
            "Ward API listening"
        );

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown(shutdown_signal.clone()))
            .into_future();
        let mut server = tokio::spawn(server);

        tokio::select! {
            joined = &mut server => return Ok(server_exit_code(joined)),
            _ = wait_for_shutdown(shutdown_signal) => {}
        }

        let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
        tracing::info!(
            timeout_secs = grace.as_secs(),
            "Shutdown requested, draining in-flight requests"
        );

        match tokio::time::timeout(grace, &mut server).await {
            Ok(joined) => Ok(server_exit_code(joined)),
            Err(_) => {
                tracing::warn!("Shutdown timeout elapsed, aborting remaining requests");
                server.abort();
                Ok(EXIT_OK)
            }
        }
    }
}

async fn wait_for_shutdown(mut shutdown_signal: watch::Receiver<bool>) {
    // A closed channel also means shutdown.
    let _ = shutdown_signal.wait_for(|stop| *stop).await;
}

fn server_exit_code(joined: Result<std::io::Result<()>, tokio::task::JoinError>) -> i32 {
    match joined {
        Ok(Ok(())) => {
            tracing::info!("Server stopped");
            EXIT_OK
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Server failed");
            EXIT_FATAL
        }
        Err(e) => {
            tracing::error!(error = %e, "Server task failed");
            EXIT_FATAL
        }
    }
}
