//! Source collection for the security scan.
//!
//! Walks a repository snapshot and builds the `path → content` map sent to
//! the scan service. Filtering is strict and deterministic:
//! dependency/build directories and dot-directories are skipped wholesale,
//! only supported language extensions are kept, and oversized files are
//! dropped.

use std::collections::BTreeMap;
use std::path::Path;

use vigil_core::VigilError;

/// Maximum file size to collect (1 MiB).
const MAX_FILE_SIZE: u64 = 1_048_576;

/// Directory names never descended into.
const SKIP_DIRS: [&str; 8] = [
    ".git",
    "node_modules",
    "vendor",
    "venv",
    "__pycache__",
    ".venv",
    "dist",
    "build",
];

/// Lowercased extensions of supported languages.
const ALLOWED_EXTENSIONS: [&str; 15] = [
    "go", "py", "js", "ts", "jsx", "tsx", "java", "rb", "php", "cs", "c", "cpp", "cc", "h", "hpp",
];

/// Collect scannable source files under `root`.
///
/// Keys are paths relative to `root`. Unreadable files are skipped with a
/// warning; an empty result is not an error.
///
/// # Errors
///
/// Returns [`VigilError::Validation`] if `root` is not a directory.
pub fn collect_code_files(root: &Path) -> Result<BTreeMap<String, String>, VigilError> {
    if !root.is_dir() {
        return Err(VigilError::Validation(format!(
            "snapshot path is not a directory: {}",
            root.display()
        )));
    }

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| !is_skipped_dir(entry))
        .build();

    let mut files = BTreeMap::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "walk error, skipping entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        if !ext.is_some_and(|e| ALLOWED_EXTENSIONS.contains(&e.as_str())) {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) if metadata.len() > MAX_FILE_SIZE => {
                tracing::debug!(file = %path.display(), "skipping large file");
                continue;
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "failed to stat file");
                continue;
            }
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "failed to read file");
                continue;
            }
        };

        let relative = path.strip_prefix(root).unwrap_or(path);
        files.insert(
            relative.to_string_lossy().into_owned(),
            String::from_utf8_lossy(&bytes).into_owned(),
        );
    }

    Ok(files)
}

fn is_skipped_dir(entry: &ignore::DirEntry) -> bool {
    // Never filter the walk root itself.
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().is_some_and(|t| t.is_dir()) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    SKIP_DIRS.contains(&name.as_ref()) || name.starts_with('.')
}
