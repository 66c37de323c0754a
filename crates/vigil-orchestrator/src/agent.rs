//! Clients for the two call modes of the authoring service: `describe`
//! produces a PR description, `review` produces a code review informed by
//! that description.

use serde::{Deserialize, Serialize};

use vigil_core::{PrMetadata, VigilError};

#[derive(Serialize)]
struct DescribeRequest<'a> {
    mode: &'static str,
    pr: &'a PrMetadata,
}

#[derive(Deserialize)]
struct DescribeResponse {
    description_markdown: String,
}

#[derive(Serialize)]
struct ReviewRequest<'a> {
    mode: &'static str,
    pr: &'a PrMetadata,
    description_markdown: &'a str,
}

#[derive(Deserialize)]
struct ReviewResponse {
    review_markdown: String,
}

/// Request a PR description.
///
/// # Errors
///
/// Returns [`VigilError::Transport`] on connection or decode failure, or
/// [`VigilError::Protocol`] on a non-2xx status. Both are fatal to the
/// pipeline.
pub async fn describe(
    http: &reqwest::Client,
    url: &str,
    meta: &PrMetadata,
) -> Result<String, VigilError> {
    tracing::debug!(url, mode = "describe", "calling PR agent");

    let payload = DescribeRequest {
        mode: "describe",
        pr: meta,
    };
    let out: DescribeResponse = post_json(http, url, "pr-agent describe", &payload).await?;

    tracing::debug!("PR agent describe response decoded");
    Ok(out.description_markdown)
}

/// Request a code review, carrying the description forward.
///
/// # Errors
///
/// Same failure modes as [`describe`]; fatal to the pipeline.
pub async fn review(
    http: &reqwest::Client,
    url: &str,
    meta: &PrMetadata,
    description_markdown: &str,
) -> Result<String, VigilError> {
    tracing::debug!(url, mode = "review", "calling PR agent");

    let payload = ReviewRequest {
        mode: "review",
        pr: meta,
        description_markdown,
    };
    let out: ReviewResponse = post_json(http, url, "pr-agent review", &payload).await?;

    tracing::debug!("PR agent review response decoded");
    Ok(out.review_markdown)
}

/// POST a JSON payload and decode a JSON response, with service-named
/// errors. Shared by every downstream client in this crate.
pub(crate) async fn post_json<Req, Resp>(
    http: &reqwest::Client,
    url: &str,
    service: &str,
    payload: &Req,
) -> Result<Resp, VigilError>
where
    Req: Serialize,
    Resp: for<'de> Deserialize<'de>,
{
    let response = http
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(|e| VigilError::Transport(format!("{service} http error: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VigilError::Protocol {
            service: service.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json()
        .await
        .map_err(|e| VigilError::Transport(format!("decode {service} response: {e}")))
}
