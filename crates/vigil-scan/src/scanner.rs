//! Scan execution: configuration fallback and result shaping.

use std::time::Duration;

use vigil_core::{ScanConfig, ScanRequest, ScanResponse, VigilError};

use crate::markdown;
use crate::rpc::{CodeFile, Finding, RpcClient};

/// Scan configurations tried in order. The first one yielding findings
/// wins; later configurations are not consulted.
pub const SCAN_CONFIGS: [&str; 3] = ["p/default", "p/security-audit", "p/ci"];

/// Deadline for one full scan request, across all configuration attempts.
pub const SCAN_TIMEOUT: Duration = Duration::from_secs(10 * 60);

const RPC_TIMEOUT: Duration = Duration::from_secs(5 * 60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the configuration-fallback scan against the remote RPC.
pub struct Scanner {
    rpc: RpcClient,
}

impl Scanner {
    /// Build a scanner from service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ScanConfig) -> Result<Self, VigilError> {
        let http = reqwest::Client::builder()
            .timeout(RPC_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| VigilError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            rpc: RpcClient::new(
                http,
                config.semgrep_mcp_url.clone(),
                config.semgrep_app_token.clone(),
            ),
        })
    }

    /// Run the scan algorithm for one request.
    ///
    /// Never fails: every outcome, including "all configurations errored",
    /// is encoded in the returned [`ScanResponse`].
    pub async fn scan(&self, request: &ScanRequest) -> ScanResponse {
        if request.files.is_empty() {
            tracing::warn!("no code files provided");
            return ScanResponse::no_files();
        }

        tracing::info!(file_count = request.files.len(), "processing files from request");

        let code_files: Vec<CodeFile> = request
            .files
            .iter()
            .map(|(filename, content)| CodeFile {
                filename: filename.clone(),
                content: content.clone(),
            })
            .collect();

        let mut last_error: Option<VigilError> = None;

        for config in SCAN_CONFIGS {
            tracing::debug!(config, "trying scan config");

            match self.rpc.scan(&code_files, config).await {
                Err(err) => {
                    tracing::warn!(config, error = %err, "scan config failed");
                    last_error = Some(err);
                }
                Ok(payload) if payload.results.is_empty() => {
                    // No hit yet; a later configuration may still match.
                }
                Ok(payload) => {
                    tracing::info!(
                        config,
                        findings = payload.results.len(),
                        "scan successful"
                    );
                    if !payload.errors.is_empty() {
                        tracing::debug!(errors = payload.errors.len(), "scanner reported partial errors");
                    }
                    return shape(payload.results);
                }
            }
        }

        if let Some(err) = last_error {
            tracing::warn!(error = %err, "all scan configs failed");
            return ScanResponse::fallback("Semgrep scan failed for all configurations");
        }

        tracing::info!("scan found no issues");
        ScanResponse::clean()
    }
}

fn shape(findings: Vec<Finding>) -> ScanResponse {
    let severity = markdown::tally(&findings);
    let findings_markdown = markdown::format_findings(&findings);

    tracing::info!(
        total = findings.len(),
        blocker = severity.blocker,
        critical = severity.critical,
        major = severity.major,
        minor = severity.minor,
        info = severity.info,
        "scan completed successfully"
    );

    ScanResponse {
        status: "success".into(),
        findings_markdown,
        severity,
        findings_count: findings.len() as u32,
        scan_duration: String::new(),
        error: None,
    }
}
