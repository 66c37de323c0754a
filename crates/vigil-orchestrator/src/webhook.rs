//! GitHub-shaped pull-request webhook events.

use serde::Deserialize;

use vigil_core::PrMetadata;

/// A pull-request event as delivered by the source-control host.
///
/// Decoding is lenient: absent fields default to empty so a sparse payload
/// still parses and is judged by its `action`. Only `opened`, `reopened`,
/// and `synchronize` trigger a pipeline; every other action is ignored at
/// the handler. Another provider's "PR updated" events would be mapped
/// here, explicitly, not silently.
///
/// # Examples
///
/// ```
/// use vigil_orchestrator::webhook::PrEvent;
///
/// let event: PrEvent = serde_json::from_str(r#"{"action": "closed"}"#).unwrap();
/// assert!(!event.is_triggering());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrEvent {
    /// Event action, e.g. `opened`.
    pub action: String,
    /// Pull-request number.
    pub number: u64,
    /// Pull-request details.
    pub pull_request: PullRequest,
    /// Destination repository.
    pub repository: Repository,
}

/// The `pull_request` object of the event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    pub title: String,
    pub body: String,
    pub html_url: String,
    pub head: Head,
    pub base: Base,
}

/// Head of the source branch, including the repository it lives in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Head {
    #[serde(rename = "ref")]
    pub branch: String,
    pub sha: String,
    pub repo: Repository,
}

/// Base (target) branch of the pull request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Base {
    #[serde(rename = "ref")]
    pub branch: String,
}

/// A repository reference with its owner.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
}

/// Repository owner.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Owner {
    pub login: String,
}

impl PrEvent {
    /// Whether this action starts a review pipeline.
    pub fn is_triggering(&self) -> bool {
        matches!(self.action.as_str(), "opened" | "reopened" | "synchronize")
    }

    /// Build the immutable PR metadata the pipeline consumes.
    pub fn to_metadata(&self) -> PrMetadata {
        PrMetadata {
            repo_owner: self.repository.owner.login.clone(),
            repo_name: self.repository.name.clone(),
            head_repo_owner: self.pull_request.head.repo.owner.login.clone(),
            head_repo_name: self.pull_request.head.repo.name.clone(),
            pr_number: self.number,
            head_sha: self.pull_request.head.sha.clone(),
            title: self.pull_request.title.clone(),
            body: self.pull_request.body.clone(),
            source_branch: self.pull_request.head.branch.clone(),
            target_branch: self.pull_request.base.branch.clone(),
            url: self.pull_request.html_url.clone(),
            local_path: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_EVENT: &str = r#"{
        "action": "opened",
        "number": 42,
        "pull_request": {
            "title": "Add widget",
            "body": "Adds the widget.",
            "html_url": "https://github.com/acme/widget/pull/42",
            "head": {
                "ref": "feat-x",
                "sha": "abc",
                "repo": {"name": "widget", "owner": {"login": "fork-u"}}
            },
            "base": {"ref": "main"}
        },
        "repository": {"name": "widget", "owner": {"login": "acme"}}
    }"#;

    #[test]
    fn full_event_maps_to_metadata() {
        let event: PrEvent = serde_json::from_str(FULL_EVENT).unwrap();
        assert!(event.is_triggering());

        let meta = event.to_metadata();
        assert_eq!(meta.repo_owner, "acme");
        assert_eq!(meta.repo_name, "widget");
        assert_eq!(meta.head_repo_owner, "fork-u");
        assert_eq!(meta.head_repo_name, "widget");
        assert_eq!(meta.pr_number, 42);
        assert_eq!(meta.head_sha, "abc");
        assert_eq!(meta.source_branch, "feat-x");
        assert_eq!(meta.target_branch, "main");
        assert_eq!(meta.url, "https://github.com/acme/widget/pull/42");
        assert!(meta.local_path.is_empty());
    }

    #[test]
    fn triggering_actions() {
        for action in ["opened", "reopened", "synchronize"] {
            let event = PrEvent {
                action: action.into(),
                ..PrEvent::default()
            };
            assert!(event.is_triggering(), "{action} should trigger");
        }
        for action in ["closed", "edited", "labeled", ""] {
            let event = PrEvent {
                action: action.into(),
                ..PrEvent::default()
            };
            assert!(!event.is_triggering(), "{action} should not trigger");
        }
    }

    #[test]
    fn sparse_payload_still_parses() {
        let event: PrEvent = serde_json::from_str(r#"{"action": "opened"}"#).unwrap();
        assert!(event.is_triggering());
        let meta = event.to_metadata();
        assert_eq!(meta.pr_number, 0);
        assert!(meta.repo_owner.is_empty());
    }
}
