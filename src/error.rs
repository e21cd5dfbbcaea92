//! Error types for gradlew-update

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while updating wrappers or talking to GitHub
#[derive(Debug, Error)]
pub enum Error {
    /// Release metadata or a published checksum could not be fetched
    #[error("unable to fetch release information: {0}")]
    ReleaseFetch(String),

    /// No `distributionUrl` line matched the expected pattern
    #[error("unable to parse properties file {}", .0.display())]
    MalformedWrapperFile(PathBuf),

    /// Wrapper paths must be absolute
    #[error("{} is not an absolute path", .0.display())]
    InvalidPath(PathBuf),

    /// Checksum mismatch or failing smoke run of the regenerated wrapper
    #[error("wrapper verification error: {0}")]
    Verification(String),

    /// The build tool failed to regenerate the wrapper
    #[error("wrapper update failed: {0}")]
    Update(String),

    /// A git subprocess exited with a non-zero status
    #[error("git {command} failed: {stderr}")]
    Git {
        /// Subcommand that failed
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// The configured base branch could not be checked out
    #[error("invalid base branch {0}")]
    InvalidBaseBranch(String),

    /// GitHub API returned something unexpected
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Invalid run configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Cross-phase state could not be read or written
    #[error("state error: {0}")]
    State(String),

    /// Authentication token missing
    #[error("authentication error: {0}")]
    Auth(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Octocrab client error
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid include/ignore glob
    #[error("invalid glob: {0}")]
    Glob(#[from] globset::Error),

    /// Directory traversal error
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
