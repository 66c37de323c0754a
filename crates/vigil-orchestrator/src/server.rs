//! HTTP entrypoint for the orchestrator.
//!
//! The contract that matters most here: the pipeline's lifetime is
//! decoupled from the webhook request's lifetime. The pipeline runs on its
//! own spawned task under its own deadline; if the webhook sender's HTTP
//! timeout is shorter than the pipeline, the connection drops, a warning is
//! logged, and the work carries on untouched.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::pipeline::{Pipeline, PipelineError};
use crate::webhook::PrEvent;

/// Build the orchestrator router: `GET /healthz` and `POST /webhook`.
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn webhook(State(pipeline): State<Arc<Pipeline>>, body: String) -> Response {
    let event: PrEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(err) => {
            tracing::error!(error = %err, "failed to decode webhook payload");
            return (StatusCode::BAD_REQUEST, "invalid payload").into_response();
        }
    };

    tracing::debug!(pr_number = event.number, action = %event.action, "received PR webhook");

    if !event.is_triggering() {
        tracing::debug!(action = %event.action, "ignoring PR event action");
        return (StatusCode::OK, "ignored").into_response();
    }

    let meta = event.to_metadata();
    let timeout = pipeline.config().pipeline_timeout;

    tracing::info!(
        repo = %meta.repo_slug(),
        pr = meta.pr_number,
        timeout_secs = timeout.as_secs(),
        "starting PR processing on a detached pipeline task"
    );

    // If the webhook client disconnects, axum drops this handler future;
    // the guard's Drop then logs the disconnect. The pipeline itself lives
    // on its own task and is unaffected.
    let watch = DisconnectWatch::new(meta.repo_slug(), meta.pr_number);

    let task = tokio::spawn({
        let pipeline = Arc::clone(&pipeline);
        async move {
            match tokio::time::timeout(timeout, pipeline.process(meta)).await {
                Ok(result) => result,
                Err(_) => Err(PipelineError::DeadlineExceeded(timeout)),
            }
        }
    });

    let result = match task.await {
        Ok(result) => result,
        Err(err) => {
            watch.disarm();
            tracing::error!(error = %err, "pipeline task failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "processing error").into_response();
        }
    };

    let (repo, pr) = watch.disarm();
    match result {
        Ok(()) => {
            tracing::info!(repo = %repo, pr, "PR processing completed successfully");
            (StatusCode::OK, "processed").into_response()
        }
        Err(err) => {
            tracing::error!(
                stage = err.stage_label(),
                repo = %repo,
                pr,
                error = %err,
                "failed to process PR"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "processing error").into_response()
        }
    }
}

/// Logs a warning if the webhook request is dropped before the pipeline
/// resolves.
struct DisconnectWatch {
    repo: String,
    pr: u64,
    armed: bool,
}

impl DisconnectWatch {
    fn new(repo: String, pr: u64) -> Self {
        Self {
            repo,
            pr,
            armed: true,
        }
    }

    /// Defuse the guard once the handler is going to respond normally.
    fn disarm(mut self) -> (String, u64) {
        self.armed = false;
        (std::mem::take(&mut self.repo), self.pr)
    }
}

impl Drop for DisconnectWatch {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                repo = %self.repo,
                pr = self.pr,
                "webhook client disconnected, but processing continues"
            );
        }
    }
}
