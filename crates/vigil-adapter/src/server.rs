//! HTTP surface of the adapter: `GET /health` and `POST /comment`.
//!
//! Each comment request moves through parsing → target resolution →
//! posting. Parsing probes the orchestrator's full-metadata shape first and
//! falls back to the minimal `{pr, body}` shape; resolution fills in the
//! configured default destination where the request left it out.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use vigil_core::{preview, AdapterConfig, CommentRequest};

use crate::github::GitHubClient;

/// Shared state for the adapter handlers.
pub struct AdapterState {
    /// Resolved configuration, including the default destination.
    pub config: AdapterConfig,
    /// Authenticated GitHub client.
    pub github: GitHubClient,
}

/// Build the adapter router.
pub fn router(state: Arc<AdapterState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/comment", post(comment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy"}))
}

/// The minimal request shape, kept for backward compatibility.
#[derive(Debug, Deserialize)]
struct SimpleCommentRequest {
    pr: u64,
    #[serde(default)]
    body: String,
}

/// A parsed comment request, before target resolution.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedComment {
    /// Full-metadata shape; destination may still be incomplete.
    Full {
        owner: Option<String>,
        repo: Option<String>,
        pr_number: u64,
        body: String,
    },
    /// Minimal shape; destination comes entirely from configuration.
    Simple { pr_number: u64, body: String },
}

/// Probe the two accepted request shapes.
///
/// A shape only matches when it parses *and* carries a non-zero PR number;
/// otherwise the next shape is tried.
pub fn parse_comment_request(raw: &str) -> Option<ParsedComment> {
    if let Ok(full) = serde_json::from_str::<CommentRequest>(raw) {
        if full.pr.pr_number != 0 {
            return Some(ParsedComment::Full {
                owner: Some(full.pr.repo_owner).filter(|s| !s.is_empty()),
                repo: Some(full.pr.repo_name).filter(|s| !s.is_empty()),
                pr_number: full.pr.pr_number,
                body: full.body,
            });
        }
    }

    if let Ok(simple) = serde_json::from_str::<SimpleCommentRequest>(raw) {
        if simple.pr != 0 {
            return Some(ParsedComment::Simple {
                pr_number: simple.pr,
                body: simple.body,
            });
        }
    }

    None
}

/// Resolve the destination repository, filling gaps from configuration.
///
/// # Errors
///
/// Returns a client-facing message when the destination cannot be
/// resolved.
pub fn resolve_target(
    parsed: ParsedComment,
    default_owner: Option<&str>,
    default_repo: Option<&str>,
) -> Result<(String, String, u64, String), &'static str> {
    match parsed {
        ParsedComment::Full {
            owner,
            repo,
            pr_number,
            body,
        } => {
            let owner = owner.or_else(|| default_owner.map(String::from));
            let repo = repo.or_else(|| default_repo.map(String::from));
            match (owner, repo) {
                (Some(owner), Some(repo)) => Ok((owner, repo, pr_number, body)),
                _ => Err("missing repo_owner or repo_name"),
            }
        }
        ParsedComment::Simple { pr_number, body } => match (default_owner, default_repo) {
            (Some(owner), Some(repo)) => Ok((owner.to_string(), repo.to_string(), pr_number, body)),
            _ => Err("missing REPO_OWNER or REPO_NAME"),
        },
    }
}

async fn comment(State(state): State<Arc<AdapterState>>, raw: String) -> Response {
    if state.config.debug {
        tracing::debug!(body = %preview(&raw, 400), "incoming comment request");
    }

    let Some(parsed) = parse_comment_request(&raw) else {
        tracing::error!("could not parse body as a comment request");
        return (StatusCode::BAD_REQUEST, "invalid JSON format").into_response();
    };

    let (owner, repo, pr_number, body) = match resolve_target(
        parsed,
        state.config.default_owner.as_deref(),
        state.config.default_repo.as_deref(),
    ) {
        Ok(target) => target,
        Err(message) => {
            tracing::error!(message, "destination could not be resolved");
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    match state.github.post_comment(&owner, &repo, pr_number, &body).await {
        Ok(posted) => Json(json!({
            "success": true,
            "comment_id": posted.id,
            "url": posted.url,
        }))
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "GitHub comment failed");
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
    }
}
