//! Client for the synthesis service, which folds the description, review,
//! and security markdown into the single comment body.

use serde::{Deserialize, Serialize};

use vigil_core::{preview, PrMetadata, SeverityCounts, VigilError};

use crate::agent::post_json;

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    pr: &'a PrMetadata,
    description_markdown: &'a str,
    review_markdown: &'a str,
    semgrep_markdown: &'a str,
    semgrep_severity: SeverityCounts,
}

#[derive(Deserialize)]
struct SynthesisResponse {
    markdown: String,
}

/// Synthesize the final comment markdown.
///
/// # Errors
///
/// Transport and non-2xx failures are fatal to the pipeline.
pub async fn synthesize(
    http: &reqwest::Client,
    url: &str,
    meta: &PrMetadata,
    description_markdown: &str,
    review_markdown: &str,
    semgrep_markdown: &str,
    semgrep_severity: SeverityCounts,
) -> Result<String, VigilError> {
    tracing::debug!(url, severity = ?semgrep_severity, "calling summarizer");

    let payload = SynthesisRequest {
        pr: meta,
        description_markdown,
        review_markdown,
        semgrep_markdown,
        semgrep_severity,
    };
    let out: SynthesisResponse = post_json(http, url, "summarizer", &payload).await?;

    tracing::debug!(markdown_preview = %preview(&out.markdown, 200), "summarizer response decoded");
    Ok(out.markdown)
}
