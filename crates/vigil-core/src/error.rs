/// Errors that can occur across the Vigil pipeline.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `anyhow::Error` at the boundary.
///
/// # Examples
///
/// ```
/// use vigil_core::VigilError;
///
/// let err = VigilError::Config("missing GITHUB_TOKEN".into());
/// assert!(err.to_string().contains("missing GITHUB_TOKEN"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository snapshot (clone) failure.
    #[error("git error: {0}")]
    Git(String),

    /// Failure reaching a downstream service.
    #[error("transport error: {0}")]
    Transport(String),

    /// A downstream service responded with a non-success status.
    #[error("{service} returned status {status}")]
    Protocol {
        /// Name of the downstream service.
        service: String,
        /// HTTP status code it returned.
        status: u16,
    },

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed or unresolvable input.
    #[error("validation error: {0}")]
    Validation(String),
}
