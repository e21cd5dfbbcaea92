//! GitHub token resolution

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;
use tracing::debug;

/// GitHub authentication configuration
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"***")
            .field("source", &self.source)
            .finish()
    }
}

/// Get GitHub authentication
///
/// Priority:
/// 1. explicit `repo-token` input
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
/// 4. gh CLI (`gh auth token`)
pub async fn get_github_auth(explicit: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::Input,
        });
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(token) = env::var(var).ok().filter(|t| !t.trim().is_empty()) {
            debug!("Using token from {var}");
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = get_gh_cli_token().await {
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "No GitHub token found. Set the repo-token input, GITHUB_TOKEN, or run `gh auth login`"
            .to_string(),
    ))
}

async fn get_gh_cli_token() -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
