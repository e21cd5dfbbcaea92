//! Progress callback trait for interface-agnostic updates
//!
//! The orchestrator reports what it is doing through this trait so the CLI
//! can render it (plain, styled, or as GitHub Actions log groups) without
//! the library knowing about terminals.

use crate::error::Error;
use crate::types::PullRequestData;
use crate::wrapper::WrapperDescriptor;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

/// Orchestration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fetching the target release
    ResolvingRelease,
    /// Looking for an existing update branch
    CheckingBranch,
    /// Creating the update branch
    PreparingBranch,
    /// Updating wrappers one by one
    UpdatingWrappers,
    /// Pushing the update branch
    Pushing,
    /// Opening the pull request
    CreatingPullRequest,
    /// Assigning labels and reviewers
    Notifying,
    /// Run complete
    Complete,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ResolvingRelease => "Resolving release",
            Self::CheckingBranch => "Checking for an existing branch",
            Self::PreparingBranch => "Creating branch",
            Self::UpdatingWrappers => "Updating wrappers",
            Self::Pushing => "Pushing branch",
            Self::CreatingPullRequest => "Creating pull request",
            Self::Notifying => "Assigning labels and reviewers",
            Self::Complete => "Done",
        })
    }
}

/// What happened to one wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapperStatus {
    /// Already at the target version
    UpToDate,
    /// The updater ran but nothing changed on disk
    Unchanged,
    /// Updated, verified and committed
    Committed {
        /// Version before the update
        from: String,
        /// Number of files in the commit
        files: usize,
    },
}

impl fmt::Display for WrapperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate => f.write_str("already up-to-date"),
            Self::Unchanged => f.write_str("nothing to update"),
            Self::Committed { from, files } => {
                write!(f, "updated from {from} ({files} files)")
            }
        }
    }
}

/// Progress callback trait
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new step
    async fn on_step(&self, step: Step);

    /// Called before a wrapper is processed
    async fn on_wrapper_start(&self, wrapper: &WrapperDescriptor);

    /// Called after a wrapper has been processed
    async fn on_wrapper_done(&self, path: &Path, status: &WrapperStatus);

    /// Called when the pull request is created
    async fn on_pr_created(&self, pr: &PullRequestData);

    /// Called when an error occurs
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_step(&self, _step: Step) {}
    async fn on_wrapper_start(&self, _wrapper: &WrapperDescriptor) {}
    async fn on_wrapper_done(&self, _path: &Path, _status: &WrapperStatus) {}
    async fn on_pr_created(&self, _pr: &PullRequestData) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
