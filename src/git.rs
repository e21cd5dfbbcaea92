//! Git plumbing
//!
//! Thin async wrappers around the `git` executable. A non-zero exit status
//! becomes [`Error::Git`] carrying the captured stderr.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Git operations used by the update workflow
#[async_trait]
pub trait Git: Send + Sync {
    /// Shallow fetch from the default remote
    async fn fetch(&self) -> Result<()>;

    /// Check out an existing branch
    async fn checkout(&self, branch: &str) -> Result<()>;

    /// Create and check out a branch at `start_point`
    async fn checkout_create_branch(&self, branch: &str, start_point: &str) -> Result<()>;

    /// Stage paths
    async fn add(&self, paths: &[String]) -> Result<()>;

    /// Commit staged changes (signed off)
    async fn commit(&self, message: &str) -> Result<()>;

    /// Push HEAD to `refs/heads/<branch>` on origin
    async fn push(&self, branch: &str) -> Result<()>;

    /// Paths with unstaged modifications, relative to the working directory
    async fn diff_names_only(&self) -> Result<Vec<String>>;

    /// Commit SHA of HEAD
    async fn parse_head(&self) -> Result<String>;

    /// Set a repository-local config value
    async fn config(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every value of a repository-local config key
    async fn unset_config(&self, key: &str) -> Result<()>;

    /// URL of a configured remote
    async fn remote_url(&self, remote: &str) -> Result<String>;
}

/// Git implementation shelling out to the `git` binary
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Run git commands inside `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::Git {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl Git for GitCli {
    async fn fetch(&self) -> Result<()> {
        self.run(&["fetch", "--depth=1"]).await.map(drop)
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).await.map(drop)
    }

    async fn checkout_create_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch, start_point])
            .await
            .map(drop)
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).await.map(drop)
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message, "--signoff"])
            .await
            .map(drop)
    }

    async fn push(&self, branch: &str) -> Result<()> {
        let refspec = format!("HEAD:refs/heads/{branch}");
        self.run(&["push", "--force-with-lease", "origin", &refspec])
            .await
            .map(drop)
    }

    async fn diff_names_only(&self) -> Result<Vec<String>> {
        let stdout = self.run(&["diff", "--name-only", "--relative"]).await?;
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    async fn parse_head(&self) -> Result<String> {
        self.run(&["rev-parse", "HEAD"]).await
    }

    async fn config(&self, key: &str, value: &str) -> Result<()> {
        self.run(&["config", "--local", key, value]).await.map(drop)
    }

    async fn unset_config(&self, key: &str) -> Result<()> {
        self.run(&["config", "--local", "--unset-all", key])
            .await
            .map(drop)
    }

    async fn remote_url(&self, remote: &str) -> Result<String> {
        self.run(&["remote", "get-url", remote]).await
    }
}

/// Commit message for one wrapper upgrade
pub fn commit_message(source_version: &str, target_version: &str) -> String {
    format!(
        "Update Gradle Wrapper from {source_version} to {target_version}.\n\n\
         Update Gradle Wrapper from {source_version} to {target_version}.\n\
         - [Release notes](https://docs.gradle.org/{target_version}/release-notes.html)"
    )
}
