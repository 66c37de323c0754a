//! Client for the security scan service.
//!
//! Unlike every other stage, scanning is recoverable: a flaky or
//! unreachable scanner must not block the review. The outcome type is not
//! a sum of scan-or-error; it is always a scan, where the failure mode is
//! encoded as a deterministic best-practices body with zero severity.

use vigil_core::{
    OrchestratorConfig, PrMetadata, ScanRequest, ScanResponse, SeverityCounts, FALLBACK_MARKDOWN,
};

use crate::collect;
use crate::pipeline::Stage;

/// What the scan stage hands to synthesis.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Shaped findings markdown, or the fallback body.
    pub findings_markdown: String,
    /// Severity totals; all zero on the fallback path.
    pub severity: SeverityCounts,
}

impl ScanOutcome {
    /// The degraded outcome used whenever scanning cannot produce results.
    pub fn heuristic() -> Self {
        Self {
            findings_markdown: FALLBACK_MARKDOWN.into(),
            severity: SeverityCounts::default(),
        }
    }
}

/// Collect the snapshot's source files and run them through the scan
/// service. Every failure degrades to [`ScanOutcome::heuristic`].
pub async fn run_scan(
    http: &reqwest::Client,
    config: &OrchestratorConfig,
    meta: &PrMetadata,
) -> ScanOutcome {
    if meta.local_path.is_empty() {
        tracing::error!(stage = %Stage::Scan, "local_path empty; snapshot stage did not run");
        return ScanOutcome::heuristic();
    }

    tracing::info!(
        path = %meta.local_path,
        semgrep_url = %config.semgrep_service_url,
        "collecting files for security scan"
    );

    let files = match collect::collect_code_files(meta.local_path.as_ref()) {
        Ok(files) => files,
        Err(err) => {
            tracing::error!(stage = %Stage::Collect, error = %err, "failed to collect code files");
            return ScanOutcome::heuristic();
        }
    };

    if files.is_empty() {
        tracing::warn!(stage = %Stage::Collect, "no code files found");
        return ScanOutcome::heuristic();
    }

    tracing::info!(file_count = files.len(), "files collected, sending to scan service");

    let payload = ScanRequest {
        repo_path: meta.local_path.clone(),
        repo_url: Some(format!(
            "https://{}/{}/{}",
            config.git_host, meta.repo_owner, meta.repo_name
        )),
        branch: Some(meta.source_branch.clone()),
        files,
    };

    let url = format!("{}/scan", config.semgrep_service_url);
    let response = match http.post(&url).json(&payload).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(stage = %Stage::Scan, error = %err, "scan service http error");
            return ScanOutcome::heuristic();
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(stage = %Stage::Scan, status = status.as_u16(), "scan service returned error status");
        return ScanOutcome::heuristic();
    }

    let scan: ScanResponse = match response.json().await {
        Ok(scan) => scan,
        Err(err) => {
            tracing::error!(stage = %Stage::Scan, error = %err, "failed to decode scan response");
            return ScanOutcome::heuristic();
        }
    };

    if let Some(error) = scan.error.as_deref().filter(|e| !e.is_empty()) {
        tracing::warn!(stage = %Stage::Scan, error, "scan service reported error");
        if scan.findings_markdown.is_empty() {
            return ScanOutcome::heuristic();
        }
    }

    tracing::info!(
        findings = scan.findings_count,
        duration = %scan.scan_duration,
        blocker = scan.severity.blocker,
        critical = scan.severity.critical,
        major = scan.severity.major,
        minor = scan.severity.minor,
        info = scan.severity.info,
        "security scan completed"
    );

    ScanOutcome {
        findings_markdown: scan.findings_markdown,
        severity: scan.severity,
    }
}
