//! Source-control adapter for the Vigil pipeline.
//!
//! Turns a structured post-comment request into a comment on the pull
//! request. Tolerates two request shapes: the orchestrator's full-metadata
//! form and a minimal `{pr, body}` form whose destination falls back to
//! configured defaults. No durable state between requests.

pub mod github;
pub mod server;

use std::sync::Arc;

use vigil_core::{AdapterConfig, VigilError};

/// Start the adapter and block until it exits.
///
/// # Errors
///
/// Returns [`VigilError`] if the GitHub client cannot be built or the
/// listener cannot bind.
pub async fn run(config: AdapterConfig) -> Result<(), VigilError> {
    let github = github::GitHubClient::new(&config.github_token)?;

    if let (Some(owner), Some(repo)) = (&config.default_owner, &config.default_repo) {
        tracing::info!(default_repo = %format!("{owner}/{repo}"), "default destination configured");
    }
    tracing::info!(port = config.port, debug = config.debug, "github adapter starting");

    let addr = format!("0.0.0.0:{}", config.port);
    let app = server::router(Arc::new(server::AdapterState { config, github }));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
