//! JSON-RPC client for the remote scanning service.
//!
//! One scan attempt is a JSON-RPC 2.0 `tools/call` of the `semgrep_scan`
//! tool. The interesting part of the wire contract is the response: the
//! scan results arrive as a JSON document embedded in
//! `result.content[0].text`, which is parsed as a nested payload.

use serde::{Deserialize, Serialize};

use vigil_core::{preview, VigilError};

/// One file handed to the scanner.
#[derive(Debug, Clone, Serialize)]
pub struct CodeFile {
    /// Repository-relative path. The scanner expects the key `filename`.
    pub filename: String,
    /// Full file content.
    pub content: String,
}

/// A single finding reported by the scanner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Finding {
    /// Rule identifier.
    #[serde(default)]
    pub check_id: String,
    /// File the finding is in.
    #[serde(default)]
    pub path: String,
    /// Location of the finding.
    #[serde(default)]
    pub start: Position,
    /// Severity, message, and excerpt.
    #[serde(default)]
    pub extra: FindingDetail,
}

/// Start position of a finding.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Position {
    /// 1-based line number.
    #[serde(default)]
    pub line: u32,
}

/// Severity label, human message, and code excerpt for a finding.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindingDetail {
    /// Raw severity label; normalized downstream.
    #[serde(default)]
    pub severity: String,
    /// Human-readable description.
    #[serde(default)]
    pub message: String,
    /// Matched source excerpt.
    #[serde(default)]
    pub lines: String,
}

/// The nested document inside `result.content[0].text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanPayload {
    /// Findings, possibly empty.
    #[serde(default)]
    pub results: Vec<Finding>,
    /// Scanner-side errors; carried through for logging only.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: &'static str,
    method: &'static str,
    params: RpcParams<'a>,
}

#[derive(Serialize)]
struct RpcParams<'a> {
    name: &'static str,
    arguments: ScanArgs<'a>,
}

#[derive(Serialize)]
struct ScanArgs<'a> {
    code_files: &'a [CodeFile],
    #[serde(skip_serializing_if = "str::is_empty")]
    config: &'a str,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: RpcResult,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Default, Deserialize)]
struct RpcResult {
    #[serde(default)]
    content: Vec<RpcContent>,
}

#[derive(Deserialize)]
struct RpcContent {
    #[serde(default, rename = "type")]
    _kind: String,
    #[serde(default)]
    text: String,
}

/// Client for the remote scanning RPC endpoint.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl RpcClient {
    /// Create a client for the given endpoint with an optional bearer
    /// credential.
    pub fn new(http: reqwest::Client, url: String, token: Option<String>) -> Self {
        Self { http, url, token }
    }

    /// Issue one scan attempt with the named configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Transport`] on connection failure, an
    /// RPC-level error object, a missing `content` array, or a non-JSON
    /// text field; [`VigilError::Protocol`] on a non-2xx status.
    pub async fn scan(
        &self,
        code_files: &[CodeFile],
        config: &str,
    ) -> Result<ScanPayload, VigilError> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: "semgrep_scan",
            method: "tools/call",
            params: RpcParams {
                name: "semgrep_scan",
                arguments: ScanArgs { code_files, config },
            },
        };

        let mut request = self
            .http
            .post(&self.url)
            .header("Accept", "application/json, text/event-stream")
            .json(&body);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
            tracing::debug!("using SEMGREP_APP_TOKEN");
        }

        let response = request
            .send()
            .await
            .map_err(|e| VigilError::Transport(format!("semgrep rpc: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VigilError::Protocol {
                service: "semgrep rpc".into(),
                status: status.as_u16(),
            });
        }

        let rpc: RpcResponse = response
            .json()
            .await
            .map_err(|e| VigilError::Transport(format!("decode rpc response: {e}")))?;

        if let Some(err) = rpc.error {
            return Err(VigilError::Transport(format!("semgrep error: {err}")));
        }

        let Some(content) = rpc.result.content.first() else {
            return Err(VigilError::Transport("no content in response".into()));
        };

        tracing::debug!(
            raw_response_preview = %preview(&content.text, 200),
            "received scan RPC response"
        );

        serde_json::from_str(&content.text).map_err(|e| {
            tracing::error!(raw_text = %preview(&content.text, 500), "failed to parse scan payload");
            VigilError::Transport(format!("parse results: {e}"))
        })
    }
}
