//! GitHub comment delivery through `octocrab`.

use vigil_core::VigilError;

/// A successfully created comment.
#[derive(Debug, Clone)]
pub struct PostedComment {
    /// GitHub's comment identifier.
    pub id: u64,
    /// Canonical URL of the comment.
    pub url: String,
}

/// Thin wrapper around an authenticated `octocrab` client.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
}

impl GitHubClient {
    /// Create a client from a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if the client cannot be built.
    pub fn new(token: &str) -> Result<Self, VigilError> {
        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| VigilError::Config(format!("failed to create GitHub client: {e}")))?;
        Ok(Self { octocrab })
    }

    /// Create a client against an alternate API base, used by tests.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if the base URI is invalid or the
    /// client cannot be built.
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self, VigilError> {
        let octocrab = octocrab::Octocrab::builder()
            .base_uri(base_uri)
            .map_err(|e| VigilError::Config(format!("invalid GitHub base URI: {e}")))?
            .personal_token(token.to_string())
            .build()
            .map_err(|e| VigilError::Config(format!("failed to create GitHub client: {e}")))?;
        Ok(Self { octocrab })
    }

    /// Post an issue comment on the pull request.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Transport`] on any GitHub API failure; the
    /// caller maps this to 502.
    pub async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<PostedComment, VigilError> {
        tracing::info!(repo = %format!("{owner}/{repo}"), pr = pr_number, "posting comment to GitHub");

        let comment = self
            .octocrab
            .issues(owner, repo)
            .create_comment(pr_number, body)
            .await
            .map_err(|e| VigilError::Transport(format!("GitHub API error: {e}")))?;

        tracing::info!(comment_id = comment.id.0, url = %comment.html_url, "GitHub comment created");

        Ok(PostedComment {
            id: comment.id.0,
            url: comment.html_url.to_string(),
        })
    }
}
