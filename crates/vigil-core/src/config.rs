use std::path::PathBuf;
use std::time::Duration;

use crate::error::VigilError;

/// Configuration for the webhook orchestrator, loaded from the environment.
///
/// # Examples
///
/// ```
/// use vigil_core::OrchestratorConfig;
///
/// let config = OrchestratorConfig::from_lookup(|_| None);
/// assert_eq!(config.listen_addr, "0.0.0.0:8085");
/// assert_eq!(config.http_timeout.as_secs(), 15 * 60);
/// ```
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Bind address for the webhook server.
    pub listen_addr: String,
    /// Log level: debug, info, warn, or error.
    pub log_level: String,
    /// Total timeout for the shared HTTP client.
    pub http_timeout: Duration,
    /// Deadline for one full pipeline, webhook receipt to comment post.
    pub pipeline_timeout: Duration,
    /// Description/review service endpoint.
    pub pr_agent_url: String,
    /// Security scan service endpoint (the `/scan` path is appended).
    pub semgrep_service_url: String,
    /// Synthesis service endpoint.
    pub summarizer_url: String,
    /// Source-control adapter endpoint.
    pub github_mcp_url: String,
    /// Host used to synthesize clone URLs; a deployment constant.
    pub git_host: String,
    /// Root directory for per-PR repository snapshots.
    pub scratch_dir: PathBuf,
}

impl OrchestratorConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup; missing keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let http_timeout_minutes = lookup("HTTP_TIMEOUT_MINUTES")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&m| m > 0)
            .unwrap_or(15);
        let pipeline_timeout_minutes = lookup("PIPELINE_TIMEOUT_MINUTES")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&m| m > 0)
            .unwrap_or(20);

        Self {
            listen_addr: normalize_addr(
                &lookup("LISTEN_ADDR").unwrap_or_else(|| ":8085".into()),
            ),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "debug".into()),
            http_timeout: Duration::from_secs(http_timeout_minutes * 60),
            pipeline_timeout: Duration::from_secs(pipeline_timeout_minutes * 60),
            pr_agent_url: lookup("PR_AGENT_URL")
                .unwrap_or_else(|| "http://pr-agent:80/post".into()),
            semgrep_service_url: lookup("SEMGREP_SERVICE_URL")
                .unwrap_or_else(|| "http://semgrep-service:8086".into()),
            summarizer_url: lookup("SUMMARIZER_URL")
                .unwrap_or_else(|| "http://summarizer-agent:80/post".into()),
            github_mcp_url: lookup("GITHUB_MCP_URL")
                .unwrap_or_else(|| "http://github-mcp-server:80/comment".into()),
            git_host: lookup("GIT_HOST").unwrap_or_else(|| "github.com".into()),
            scratch_dir: lookup("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
        }
    }
}

/// Configuration for the security scan service.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Port to bind on.
    pub port: u16,
    /// Log level.
    pub log_level: String,
    /// Remote scanning RPC endpoint.
    pub semgrep_mcp_url: String,
    /// Optional bearer credential for the scanning RPC.
    pub semgrep_app_token: Option<String>,
}

impl ScanConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup; missing keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(80),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            semgrep_mcp_url: lookup("SEMGREP_MCP_URL")
                .unwrap_or_else(|| "https://mcp.semgrep.ai/mcp".into()),
            semgrep_app_token: lookup("SEMGREP_APP_TOKEN").filter(|t| !t.is_empty()),
        }
    }
}

/// Configuration for the source-control adapter.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// Port to bind on.
    pub port: u16,
    /// Log level.
    pub log_level: String,
    /// GitHub API token used to post comments.
    pub github_token: String,
    /// Destination repository owner used when a request omits one.
    pub default_owner: Option<String>,
    /// Destination repository name used when a request omits one.
    pub default_repo: Option<String>,
    /// Log full request bodies.
    pub debug: bool,
}

impl AdapterConfig {
    /// Load from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if `GITHUB_TOKEN` is not set.
    pub fn from_env() -> Result<Self, VigilError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup; missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if `GITHUB_TOKEN` is absent or empty.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, VigilError> {
        let github_token = lookup("GITHUB_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| VigilError::Config("missing required env var: GITHUB_TOKEN".into()))?;

        Ok(Self {
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(80),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            github_token,
            default_owner: lookup("REPO_OWNER").filter(|v| !v.is_empty()),
            default_repo: lookup("REPO_NAME").filter(|v| !v.is_empty()),
            debug: lookup("DEBUG").as_deref() == Some("true"),
        })
    }
}

/// Expand a `:port` bind shorthand into an address `TcpListener` accepts.
fn normalize_addr(addr: &str) -> String {
    if let Some(port) = addr.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else {
        addr.to_string()
    }
}
