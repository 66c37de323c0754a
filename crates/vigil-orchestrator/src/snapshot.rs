//! Repository snapshotter.
//!
//! Produces a local working directory containing the PR's head-branch
//! source. The destination is a pure function of the destination
//! repository coordinates, so re-running a pipeline for the same PR reuses
//! and overwrites the same path.

use std::path::{Path, PathBuf};

use vigil_core::{OrchestratorConfig, PrMetadata, VigilError};

/// Snapshot directory for a PR: `<scratch>/<owner>-<repo>-pr<n>`.
pub fn snapshot_dir(scratch: &Path, meta: &PrMetadata) -> PathBuf {
    scratch.join(format!(
        "{}-{}-pr{}",
        meta.repo_owner, meta.repo_name, meta.pr_number
    ))
}

/// Clone URL for the head repository, which may be a fork.
pub fn clone_url(git_host: &str, meta: &PrMetadata) -> String {
    format!(
        "https://{}/{}/{}.git",
        git_host, meta.head_repo_owner, meta.head_repo_name
    )
}

/// Shallow-clone the head branch into the per-PR snapshot directory and
/// record the path in `meta.local_path`.
///
/// Any existing snapshot is removed first, best-effort; if removal fails
/// the clone itself will report the problem.
///
/// # Errors
///
/// Returns [`VigilError::Git`] if the clone fails for any reason.
pub async fn prepare_repository(
    config: &OrchestratorConfig,
    meta: &mut PrMetadata,
) -> Result<PathBuf, VigilError> {
    let dest = snapshot_dir(&config.scratch_dir, meta);
    let _ = std::fs::remove_dir_all(&dest);

    let url = clone_url(&config.git_host, meta);
    tracing::debug!(clone_url = %url, dest = %dest.display(), "cloning repository");

    let branch = meta.source_branch.clone();
    let task_dest = dest.clone();
    let task_url = url.clone();
    tokio::task::spawn_blocking(move || clone_repo(&task_url, &branch, &task_dest))
        .await
        .map_err(|e| VigilError::Git(format!("clone task failed: {e}")))??;

    tracing::info!(path = %dest.display(), "repository cloned");

    meta.local_path = dest.display().to_string();
    Ok(dest)
}

/// Blocking shallow clone of one branch.
fn clone_repo(url: &str, branch: &str, dest: &Path) -> Result<(), VigilError> {
    let mut fetch = git2::FetchOptions::new();
    fetch.depth(1);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch);
    if !branch.is_empty() {
        builder.branch(branch);
    }

    builder
        .clone(url, dest)
        .map(|_| ())
        .map_err(|e| VigilError::Git(format!("git clone failed: {}", e.message())))
}
