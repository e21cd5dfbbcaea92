//! GitHub platform service
//!
//! Abstracts the REST/GraphQL calls the workflow needs so the orchestration
//! and notification logic can run against a mock.

mod detection;
mod github;

pub use detection::{detect_repository, parse_remote_url};
pub use github::GitHubService;

use crate::config::MergeMethod;
use crate::error::Result;
use crate::types::PullRequestData;
use async_trait::async_trait;

/// GitHub operations used by both phases
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Default branch of the repository
    async fn repo_default_branch(&self) -> Result<String>;

    /// Whether `refs/heads/<branch>` exists on the remote
    async fn branch_exists(&self, branch: &str) -> Result<bool>;

    /// Open a pull request from `head` into `base`
    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestData>;

    /// Request a review from one user; returns the logins now requested
    async fn request_reviewer(&self, pr_number: u64, reviewer: &str) -> Result<Vec<String>>;

    /// Request a review from one team; returns the team slugs now requested
    async fn request_team_reviewer(&self, pr_number: u64, team: &str) -> Result<Vec<String>>;

    /// Add labels in a single call
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Whether a label exists (`Ok(false)` only on a 404)
    async fn label_exists(&self, name: &str) -> Result<bool>;

    /// Create a label
    async fn create_label(&self, name: &str, color: &str, description: &str) -> Result<()>;

    /// Comment on a pull request
    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Enable auto-merge on a pull request
    async fn enable_auto_merge(&self, pr_number: u64, method: MergeMethod) -> Result<()>;
}
