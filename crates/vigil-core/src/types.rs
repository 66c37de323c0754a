use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::severity::SeverityCounts;

/// Pull-request metadata extracted from a webhook event.
///
/// Immutable once built, except for `local_path`, which the repository
/// snapshotter fills in after cloning. `repo_owner`/`repo_name` identify the
/// destination repository (where the comment is posted); the `head_*` fields
/// identify where the source branch lives, which differs for fork PRs.
///
/// # Examples
///
/// ```
/// use vigil_core::PrMetadata;
///
/// let meta = PrMetadata {
///     repo_owner: "acme".into(),
///     repo_name: "widget".into(),
///     pr_number: 42,
///     ..PrMetadata::default()
/// };
/// assert_eq!(meta.pr_number, 42);
/// assert!(meta.local_path.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrMetadata {
    /// Owner of the destination repository.
    pub repo_owner: String,
    /// Name of the destination repository.
    pub repo_name: String,
    /// Owner of the repository holding the source branch (fork-aware).
    pub head_repo_owner: String,
    /// Name of the repository holding the source branch.
    pub head_repo_name: String,
    /// Pull-request number.
    pub pr_number: u64,
    /// Commit identifier at the head of the source branch.
    pub head_sha: String,
    /// Pull-request title.
    pub title: String,
    /// Pull-request body text.
    pub body: String,
    /// Name of the source branch.
    pub source_branch: String,
    /// Name of the target branch.
    pub target_branch: String,
    /// Canonical PR URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    /// Local snapshot directory; empty until the snapshot stage runs.
    pub local_path: String,
}

impl PrMetadata {
    /// `owner/repo` form of the destination repository, for logging.
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Request body accepted by the security scan service's `/scan` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRequest {
    /// Snapshot path, for reference and logging only.
    pub repo_path: String,
    /// Canonical repository URL, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    /// Branch that was scanned, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Repository-relative path → file content.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

/// Response body produced by the security scan service.
///
/// The service returns HTTP 200 even for logical scan failures; `status`
/// and `error` carry the outcome. See [`ScanResponse::fallback`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    /// `"success"` or `"error"`.
    pub status: String,
    /// Shaped findings markdown (or a canned body on the edge paths).
    pub findings_markdown: String,
    /// Per-bucket finding counts.
    #[serde(default)]
    pub severity: SeverityCounts,
    /// Total number of findings shaped into the markdown.
    #[serde(default)]
    pub findings_count: u32,
    /// Wall-clock scan duration, human-readable.
    #[serde(default)]
    pub scan_duration: String,
    /// Failure reason when `status` is `"error"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body emitted when the file map is empty.
pub const NO_FILES_MARKDOWN: &str = "No code files found to scan. \u{2705}";

/// Body emitted when every configuration completed cleanly with no findings.
pub const NO_FINDINGS_MARKDOWN: &str = "No security issues found by Semgrep. \u{2705}";

/// Deterministic best-practice reminders emitted when scanning itself failed.
///
/// Both the scan service (all configurations failed) and the orchestrator's
/// scan client (service unreachable) emit this exact body, so the pipeline
/// continues with a useful security section either way.
pub const FALLBACK_MARKDOWN: &str = "\
### Security Analysis

**Note:** Automated security scanning encountered issues. Here are general recommendations:

#### \u{1f512} Security Best Practices

- Ensure all user input is properly validated and sanitized
- Review authentication and authorization logic
- Check for hardcoded secrets or credentials
- Verify error handling doesn't expose sensitive information
- Ensure all dependencies are up-to-date

#### \u{1f4cb} Code Quality

- Add unit tests for critical functions
- Review error handling for edge cases
- Ensure proper logging without exposing sensitive data
- Check for unused code or expired TODOs

**Recommendation:** Run a manual security review or local Semgrep scan for comprehensive analysis.
";

impl ScanResponse {
    /// Success response for an empty file map.
    pub fn no_files() -> Self {
        Self {
            status: "success".into(),
            findings_markdown: NO_FILES_MARKDOWN.into(),
            severity: SeverityCounts::default(),
            findings_count: 0,
            scan_duration: String::new(),
            error: None,
        }
    }

    /// Success response when every configuration came back clean.
    pub fn clean() -> Self {
        Self {
            status: "success".into(),
            findings_markdown: NO_FINDINGS_MARKDOWN.into(),
            severity: SeverityCounts::default(),
            findings_count: 0,
            scan_duration: String::new(),
            error: None,
        }
    }

    /// Error-shaped response carrying the best-practices fallback body.
    pub fn fallback(error: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            findings_markdown: FALLBACK_MARKDOWN.into(),
            severity: SeverityCounts::default(),
            findings_count: 0,
            scan_duration: String::new(),
            error: Some(error.into()),
        }
    }
}

/// Request the orchestrator sends to the source-control adapter.
///
/// Decoding is lenient so the adapter can probe for this shape before
/// falling back to the minimal `{pr, body}` form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRequest {
    /// Operation name; the orchestrator always sends `"comment_pr"`.
    pub action: String,
    /// Full PR metadata naming the destination repository.
    pub pr: PrMetadata,
    /// Comment body.
    pub body: String,
    /// Body format hint; always `"markdown"`.
    pub body_format: String,
}

/// Bound a string for log output, appending a truncation marker.
///
/// # Examples
///
/// ```
/// use vigil_core::preview;
///
/// assert_eq!(preview("short", 200), "short");
/// assert!(preview(&"x".repeat(300), 200).ends_with("...(truncated)"));
/// ```
pub fn preview(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &s[..end])
}
