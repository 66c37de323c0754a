//! HTTP entrypoint for the scan service.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use vigil_core::{ScanRequest, ScanResponse};

use crate::scanner::{Scanner, SCAN_TIMEOUT};

/// Build the service router: `GET /health` and `POST /scan`.
pub fn router(scanner: Arc<Scanner>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scan", post(scan))
        .layer(TraceLayer::new_for_http())
        .with_state(scanner)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy", "service": "semgrep"}))
}

/// Scan handler. Always 200 with a [`ScanResponse`] once the request
/// parses; logical scan failures ride in the body, not the status.
async fn scan(State(scanner): State<Arc<Scanner>>, body: String) -> Response {
    let request: ScanRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::error!(error = %err, "failed to decode request");
            return (StatusCode::BAD_REQUEST, "Invalid request body").into_response();
        }
    };

    if request.repo_path.is_empty() {
        return (StatusCode::BAD_REQUEST, "repo_path is required").into_response();
    }

    tracing::info!(repo_path = %request.repo_path, "starting semgrep scan");

    let started = Instant::now();
    let mut result = match tokio::time::timeout(SCAN_TIMEOUT, scanner.scan(&request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(repo_path = %request.repo_path, "scan deadline exceeded");
            ScanResponse::fallback("Semgrep scan timed out")
        }
    };
    result.scan_duration = format!("{:?}", started.elapsed());

    Json(result).into_response()
}
