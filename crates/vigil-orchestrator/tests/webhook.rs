//! Router-level tests for the webhook surface: decode failures, ignored
//! actions, and method handling never reach the pipeline.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use vigil_core::OrchestratorConfig;
use vigil_orchestrator::pipeline::Pipeline;
use vigil_orchestrator::server::router;

fn app() -> axum::Router {
    let config = OrchestratorConfig::from_lookup(|_| None);
    router(Arc::new(Pipeline::new(config).unwrap()))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn healthz_returns_ok() {
    let response = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn invalid_payload_is_rejected() {
    let response = app()
        .oneshot(
            Request::post("/webhook")
                .body(Body::from("{definitely not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "invalid payload");
}

#[tokio::test]
async fn non_triggering_action_is_ignored_without_side_effects() {
    let event = json!({
        "action": "closed",
        "number": 42,
        "repository": {"name": "widget", "owner": {"login": "acme"}}
    });

    let response = app()
        .oneshot(
            Request::post("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ignored");
}

#[tokio::test]
async fn unknown_actions_are_ignored_too() {
    for action in ["labeled", "review_requested", ""] {
        let event = json!({"action": action, "number": 1});
        let response = app()
            .oneshot(
                Request::post("/webhook")
                    .body(Body::from(event.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "action {action:?}");
        assert_eq!(body_string(response).await, "ignored");
    }
}

#[tokio::test]
async fn wrong_method_on_webhook_is_rejected() {
    let response = app()
        .oneshot(Request::get("/webhook").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
