//! Core types, configuration, and error handling for the Vigil pipeline.
//!
//! This crate provides the shared foundation used by all other Vigil crates:
//! - [`VigilError`] — unified error type using `thiserror`
//! - [`OrchestratorConfig`], [`ScanConfig`], [`AdapterConfig`] — environment-keyed configuration
//! - Wire types: [`PrMetadata`], [`ScanRequest`], [`ScanResponse`], [`CommentRequest`]
//! - Severity model: [`SeverityBucket`], [`SeverityCounts`]
//! - [`init_logging`] — `tracing` subscriber setup shared by every service

mod config;
mod error;
mod logging;
mod severity;
mod types;

pub use config::{AdapterConfig, OrchestratorConfig, ScanConfig};
pub use error::VigilError;
pub use logging::init_logging;
pub use severity::{SeverityBucket, SeverityCounts};
pub use types::{
    preview, CommentRequest, PrMetadata, ScanRequest, ScanResponse, FALLBACK_MARKDOWN,
    NO_FILES_MARKDOWN, NO_FINDINGS_MARKDOWN,
};

/// A convenience `Result` type for Vigil operations.
pub type Result<T> = std::result::Result<T, VigilError>;
