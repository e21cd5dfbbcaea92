//! Core types for gradlew-update

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flavor of Gradle distribution a wrapper points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionType {
    /// Binaries only (`-bin.zip`)
    Bin,
    /// Binaries plus sources and docs (`-all.zip`)
    All,
}

impl DistributionType {
    /// Suffix used in distribution file names
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::All => "all",
        }
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bin" => Ok(Self::Bin),
            "all" => Ok(Self::All),
            other => Err(Error::Config(format!("unknown distribution type: {other}"))),
        }
    }
}

/// The Gradle release every wrapper is upgraded to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release version (e.g. `8.10.2`, `8.11-rc-1`)
    pub version: String,
    /// SHA-256 of the `-bin.zip` distribution
    pub bin_checksum: String,
    /// SHA-256 of the `-all.zip` distribution
    pub all_checksum: String,
    /// SHA-256 of `gradle-wrapper.jar`
    pub wrapper_checksum: String,
}

impl Release {
    /// Distribution checksum matching a wrapper's distribution type
    pub fn checksum_for(&self, distribution_type: DistributionType) -> &str {
        match distribution_type {
            DistributionType::Bin => &self.bin_checksum,
            DistributionType::All => &self.all_checksum,
        }
    }
}

/// A commit produced for one updated wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Files staged in the commit (relative to the repository root)
    pub files: Vec<String>,
    /// Version the wrapper was upgraded to
    pub target_version: String,
    /// Version the wrapper was at before the upgrade
    pub source_version: String,
    /// Distribution type of the updated wrapper
    pub distribution_type: DistributionType,
}

/// Identity of the pull request opened by the main phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestData {
    /// Web URL of the pull request
    pub url: String,
    /// Pull request number
    pub number: u64,
}

/// Repository the pull request is opened against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}
