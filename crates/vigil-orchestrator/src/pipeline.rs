//! The pipeline runner: strict stage ordering with per-stage failure
//! semantics.
//!
//! Stages run sequentially: no stage starts before its predecessor's
//! result is in hand, and within one pipeline there is no concurrency.
//! Every stage except the scan is fatal on failure; the scan degrades to a
//! heuristic outcome and the pipeline continues.

use std::fmt;
use std::time::Duration;

use vigil_core::{OrchestratorConfig, PrMetadata, VigilError};

use crate::{agent, comment, scan, snapshot, synthesis};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Identifies which stage of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Snapshot,
    Describe,
    Review,
    Collect,
    Scan,
    Synthesize,
    Post,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Snapshot => write!(f, "snapshot"),
            Stage::Describe => write!(f, "describe"),
            Stage::Review => write!(f, "review"),
            Stage::Collect => write!(f, "collect"),
            Stage::Scan => write!(f, "scan"),
            Stage::Synthesize => write!(f, "synthesize"),
            Stage::Post => write!(f, "post"),
        }
    }
}

/// A pipeline failure, tagged with the stage that produced it.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A fatal stage failed.
    #[error("{stage} stage failed: {source}")]
    Stage {
        /// The failing stage.
        stage: Stage,
        /// The underlying error.
        source: VigilError,
    },
    /// The pipeline deadline elapsed before the comment was posted.
    #[error("pipeline deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl PipelineError {
    /// Stage label for structured logging.
    pub fn stage_label(&self) -> &'static str {
        match self {
            PipelineError::Stage { stage, .. } => match stage {
                Stage::Snapshot => "snapshot",
                Stage::Describe => "describe",
                Stage::Review => "review",
                Stage::Collect => "collect",
                Stage::Scan => "scan",
                Stage::Synthesize => "synthesize",
                Stage::Post => "post",
            },
            PipelineError::DeadlineExceeded(_) => "pipeline",
        }
    }
}

/// Runs the full review pipeline for one webhook event.
///
/// Owns the shared HTTP client; safe to use from many concurrent pipeline
/// tasks.
pub struct Pipeline {
    config: OrchestratorConfig,
    http: reqwest::Client,
}

impl Pipeline {
    /// Build the pipeline runner and its shared HTTP client.
    ///
    /// The client's total timeout must stay above the pipeline deadline;
    /// the deadline, enforced by the caller, is the authoritative one.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Transport`] if the client cannot be built.
    pub fn new(config: OrchestratorConfig) -> Result<Self, VigilError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| VigilError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// The resolved configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run every stage in order for one PR.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] naming the first fatal stage. No comment
    /// is posted on any fatal failure; there is no partial or placeholder
    /// comment.
    pub async fn process(&self, mut meta: PrMetadata) -> Result<(), PipelineError> {
        tracing::info!(repo = %meta.repo_slug(), pr = meta.pr_number, "starting PR processing pipeline");

        snapshot::prepare_repository(&self.config, &mut meta)
            .await
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Snapshot,
                source,
            })?;
        tracing::debug!(path = %meta.local_path, "repository prepared");

        let description = agent::describe(&self.http, &self.config.pr_agent_url, &meta)
            .await
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Describe,
                source,
            })?;
        tracing::debug!("describe stage completed");

        let review = agent::review(&self.http, &self.config.pr_agent_url, &meta, &description)
            .await
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Review,
                source,
            })?;
        tracing::debug!("review stage completed");

        let scan = scan::run_scan(&self.http, &self.config, &meta).await;
        tracing::debug!("scan stage completed");

        let final_markdown = synthesis::synthesize(
            &self.http,
            &self.config.summarizer_url,
            &meta,
            &description,
            &review,
            &scan.findings_markdown,
            scan.severity,
        )
        .await
        .map_err(|source| PipelineError::Stage {
            stage: Stage::Synthesize,
            source,
        })?;
        tracing::debug!("synthesize stage completed");

        comment::post_comment(&self.http, &self.config.github_mcp_url, &meta, &final_markdown)
            .await
            .map_err(|source| PipelineError::Stage {
                stage: Stage::Post,
                source,
            })?;

        tracing::info!(repo = %meta.repo_slug(), pr = meta.pr_number, "PR comment posted");
        Ok(())
    }
}
