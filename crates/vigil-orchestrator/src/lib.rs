//! Webhook-driven orchestrator for the Vigil review pipeline.
//!
//! Receives pull-request webhook events, snapshots the head branch, fans
//! out to the description, review, security-scan, and synthesis services in
//! strict sequence, and posts the synthesized markdown back to the pull
//! request through the source-control adapter.
//!
//! The load-bearing contract lives in [`server`]: the pipeline runs on its
//! own spawned task under its own deadline, so a webhook client
//! disconnecting can never cancel work in progress.

pub mod agent;
pub mod collect;
pub mod comment;
pub mod pipeline;
pub mod scan;
pub mod server;
pub mod snapshot;
pub mod synthesis;
pub mod webhook;

use std::sync::Arc;

use vigil_core::{OrchestratorConfig, VigilError};

/// Start the orchestrator and block until it exits.
///
/// # Errors
///
/// Returns [`VigilError`] if the HTTP client cannot be built or the
/// listener cannot bind.
pub async fn run(config: OrchestratorConfig) -> Result<(), VigilError> {
    let addr = config.listen_addr.clone();
    let pipeline = pipeline::Pipeline::new(config)?;

    tracing::info!(
        addr = %addr,
        pr_agent = %pipeline.config().pr_agent_url,
        semgrep_service = %pipeline.config().semgrep_service_url,
        summarizer = %pipeline.config().summarizer_url,
        github_mcp = %pipeline.config().github_mcp_url,
        http_timeout_minutes = pipeline.config().http_timeout.as_secs() / 60,
        "starting orchestrator"
    );

    let app = server::router(Arc::new(pipeline));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
