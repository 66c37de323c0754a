//! Security scan service for the Vigil pipeline.
//!
//! Accepts a collected file map over HTTP, runs it through the remote
//! scanning RPC with a multi-configuration fallback, normalizes severities,
//! and shapes findings into markdown. The service never fails a scan
//! request outright: logical failures come back as an error-shaped
//! [`vigil_core::ScanResponse`] carrying a deterministic fallback body.

pub mod markdown;
pub mod rpc;
pub mod scanner;
pub mod server;

use std::sync::Arc;

use vigil_core::{ScanConfig, VigilError};

/// Start the scan service and block until it exits.
///
/// # Errors
///
/// Returns [`VigilError`] if the RPC client cannot be built or the listener
/// cannot bind.
pub async fn run(config: ScanConfig) -> Result<(), VigilError> {
    let scanner = scanner::Scanner::new(&config)?;
    let app = server::router(Arc::new(scanner));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(port = config.port, "Semgrep service starting");
    axum::serve(listener, app).await?;
    Ok(())
}
