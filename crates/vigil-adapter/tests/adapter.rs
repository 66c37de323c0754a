//! Adapter surface tests: request-shape probing, destination resolution,
//! and GitHub failure mapping, with the GitHub API mocked.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use vigil_adapter::github::GitHubClient;
use vigil_adapter::server::{router, AdapterState};
use vigil_core::AdapterConfig;

fn config(defaults: Option<(&str, &str)>) -> AdapterConfig {
    AdapterConfig {
        port: 0,
        log_level: "error".into(),
        github_token: "ghp_test".into(),
        default_owner: defaults.map(|(o, _)| o.to_string()),
        default_repo: defaults.map(|(_, r)| r.to_string()),
        debug: false,
    }
}

fn app_against(github_url: &str, defaults: Option<(&str, &str)>) -> axum::Router {
    let github = GitHubClient::with_base_uri("ghp_test", github_url).unwrap();
    router(Arc::new(AdapterState {
        config: config(defaults),
        github,
    }))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn github_user() -> serde_json::Value {
    json!({
        "login": "vigil-bot",
        "id": 1,
        "node_id": "U_1",
        "avatar_url": "https://avatars.example/1",
        "gravatar_id": "",
        "url": "https://api.github.com/users/vigil-bot",
        "html_url": "https://github.com/vigil-bot",
        "followers_url": "https://api.github.com/users/vigil-bot/followers",
        "following_url": "https://api.github.com/users/vigil-bot/following{/other_user}",
        "gists_url": "https://api.github.com/users/vigil-bot/gists{/gist_id}",
        "starred_url": "https://api.github.com/users/vigil-bot/starred{/owner}{/repo}",
        "subscriptions_url": "https://api.github.com/users/vigil-bot/subscriptions",
        "organizations_url": "https://api.github.com/users/vigil-bot/orgs",
        "repos_url": "https://api.github.com/users/vigil-bot/repos",
        "events_url": "https://api.github.com/users/vigil-bot/events{/privacy}",
        "received_events_url": "https://api.github.com/users/vigil-bot/received_events",
        "type": "User",
        "site_admin": false
    })
}

fn github_comment(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "node_id": "IC_1",
        "url": format!("https://api.github.com/repos/acme/widget/issues/comments/{id}"),
        "html_url": format!("https://github.com/acme/widget/pull/42#issuecomment-{id}"),
        "issue_url": "https://api.github.com/repos/acme/widget/issues/42",
        "body": "# Review",
        "author_association": "NONE",
        "user": github_user(),
        "created_at": "2026-08-02T00:00:00Z",
        "updated_at": "2026-08-02T00:00:00Z"
    })
}

fn orchestrator_request() -> String {
    json!({
        "action": "comment_pr",
        "pr": {"repo_owner": "acme", "repo_name": "widget", "pr_number": 42},
        "body": "# Review",
        "body_format": "markdown"
    })
    .to_string()
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = app_against("http://127.0.0.1:1", None)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn full_shape_posts_to_the_named_repository() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/acme/widget/issues/42/comments")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(github_comment(9001).to_string())
        .expect(1)
        .create_async()
        .await;

    let response = app_against(&server.url(), None)
        .oneshot(
            Request::post("/comment")
                .body(Body::from(orchestrator_request()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["comment_id"], 9001);
    mock.assert_async().await;
}

#[tokio::test]
async fn simple_shape_uses_the_configured_destination() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/acme/widget/issues/7/comments")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(github_comment(7).to_string())
        .expect(1)
        .create_async()
        .await;

    let response = app_against(&server.url(), Some(("acme", "widget")))
        .oneshot(
            Request::post("/comment")
                .body(Body::from(json!({"pr": 7, "body": "hello"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn unparseable_body_is_rejected() {
    let response = app_against("http://127.0.0.1:1", None)
        .oneshot(
            Request::post("/comment")
                .body(Body::from("definitely not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "invalid JSON format");
}

#[tokio::test]
async fn simple_shape_without_defaults_is_rejected() {
    let response = app_against("http://127.0.0.1:1", None)
        .oneshot(
            Request::post("/comment")
                .body(Body::from(json!({"pr": 7, "body": "x"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "missing REPO_OWNER or REPO_NAME");
}

#[tokio::test]
async fn github_failure_maps_to_bad_gateway() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repos/acme/widget/issues/42/comments")
        .with_status(500)
        .with_body(json!({"message": "boom"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let response = app_against(&server.url(), None)
        .oneshot(
            Request::post("/comment")
                .body(Body::from(orchestrator_request()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    mock.assert_async().await;
}
