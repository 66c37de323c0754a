//! Client for the source-control adapter that posts the final comment.

use vigil_core::{CommentRequest, PrMetadata, VigilError};

/// Post the synthesized markdown as a PR comment through the adapter.
///
/// # Errors
///
/// Transport and non-2xx failures are fatal; at this point all upstream
/// work is lost, so the caller logs prominently.
pub async fn post_comment(
    http: &reqwest::Client,
    url: &str,
    meta: &PrMetadata,
    markdown: &str,
) -> Result<(), VigilError> {
    let payload = CommentRequest {
        action: "comment_pr".into(),
        pr: meta.clone(),
        body: markdown.to_string(),
        body_format: "markdown".into(),
    };

    tracing::debug!(url, pr = meta.pr_number, "posting comment through adapter");

    let response = http
        .post(url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| VigilError::Transport(format!("github adapter http error: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VigilError::Protocol {
            service: "github adapter".into(),
            status: status.as_u16(),
        });
    }

    tracing::debug!("comment posted through adapter");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn posts_full_metadata_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/comment")
            .match_body(Matcher::PartialJson(json!({
                "action": "comment_pr",
                "pr": {"repo_owner": "acme", "repo_name": "widget", "pr_number": 42},
                "body": "# Review",
                "body_format": "markdown"
            })))
            .with_status(200)
            .with_body(json!({"success": true}).to_string())
            .expect(1)
            .create_async()
            .await;

        let meta = PrMetadata {
            repo_owner: "acme".into(),
            repo_name: "widget".into(),
            pr_number: 42,
            ..PrMetadata::default()
        };
        let http = reqwest::Client::new();
        let url = format!("{}/comment", server.url());
        post_comment(&http, &url, &meta, "# Review").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn adapter_failure_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/comment")
            .with_status(502)
            .create_async()
            .await;

        let http = reqwest::Client::new();
        let url = format!("{}/comment", server.url());
        let err = post_comment(&http, &url, &PrMetadata::default(), "body")
            .await
            .unwrap_err();

        assert!(matches!(err, VigilError::Protocol { status: 502, .. }));
    }
}
