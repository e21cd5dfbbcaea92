//! Authentication
//!
//! Resolves the GitHub token and configures git to push with it.

mod git;
mod github;

pub use git::{DEFAULT_SERVER_URL, GitAuth, cleanup, extraheader_key};
pub use github::{GitHubAuthConfig, get_github_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed as an input
    Input,
    /// Token from environment variable
    EnvVar,
    /// Token from the gh CLI
    Cli,
}
