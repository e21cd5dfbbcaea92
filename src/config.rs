//! Run configuration
//!
//! Inputs arrive as raw strings (CLI flags or `INPUT_*` environment
//! variables, following the GitHub Actions convention) and are validated
//! into [`Inputs`] before any work starts.

use crate::error::{Error, Result};
use crate::release::ReleaseChannel;
use crate::types::RepoConfig;
use clap::Args;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Default pull request title
pub const DEFAULT_PR_TITLE_TEMPLATE: &str =
    "Bump Gradle Wrapper from %sourceVersion% to %targetVersion%";

/// Merge method used when enabling auto-merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    /// Merge commit
    Merge,
    /// Rebase and merge
    Rebase,
    /// Squash and merge
    Squash,
}

impl MergeMethod {
    /// GraphQL `PullRequestMergeMethod` value
    pub const fn as_graphql(self) -> &'static str {
        match self {
            Self::Merge => "MERGE",
            Self::Rebase => "REBASE",
            Self::Squash => "SQUASH",
        }
    }
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_graphql())
    }
}

impl FromStr for MergeMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MERGE" => Ok(Self::Merge),
            "REBASE" => Ok(Self::Rebase),
            "SQUASH" => Ok(Self::Squash),
            _ => Err(Error::Config(format!(
                "merge-method must be one of MERGE, REBASE or SQUASH (got {s:?})"
            ))),
        }
    }
}

/// Raw, unvalidated inputs
#[derive(Debug, Clone, Default, Args)]
pub struct RawInputs {
    /// GitHub token used for API calls and pushing
    #[arg(long, env = "INPUT_REPO-TOKEN", hide_env_values = true)]
    pub repo_token: Option<String>,

    /// Users to request a review from (comma or whitespace separated)
    #[arg(long, env = "INPUT_REVIEWERS", default_value = "")]
    pub reviewers: String,

    /// Teams to request a review from (comma or whitespace separated)
    #[arg(long, env = "INPUT_TEAM-REVIEWERS", default_value = "")]
    pub team_reviewers: String,

    /// Labels to add to the pull request (comma or newline separated)
    #[arg(long, env = "INPUT_LABELS", default_value = "")]
    pub labels: String,

    /// Branch the update branch is created from (defaults to the repository default branch)
    #[arg(long, env = "INPUT_BASE-BRANCH", default_value = "")]
    pub base_branch: String,

    /// Branch the pull request targets (defaults to the repository default branch)
    #[arg(long, env = "INPUT_TARGET-BRANCH", default_value = "")]
    pub target_branch: String,

    /// Release channel: stable or release-candidate
    #[arg(long, env = "INPUT_RELEASE-CHANNEL", default_value = "stable")]
    pub release_channel: String,

    /// Pull request title, supports %sourceVersion% and %targetVersion%
    #[arg(long, env = "INPUT_PR-TITLE-TEMPLATE", default_value = DEFAULT_PR_TITLE_TEMPLATE)]
    pub pr_title_template: String,

    /// Write the distribution checksum into gradle-wrapper.properties
    #[arg(long, env = "INPUT_SET-DISTRIBUTION-CHECKSUM", default_value = "true")]
    pub set_distribution_checksum: String,

    /// Custom base URL for Gradle distributions
    #[arg(long, env = "INPUT_DISTRIBUTIONS-BASE-URL", default_value = "")]
    pub distributions_base_url: String,

    /// Only update wrappers matching these globs
    #[arg(long, env = "INPUT_PATHS", default_value = "")]
    pub paths: String,

    /// Never update wrappers matching these globs
    #[arg(long, env = "INPUT_PATHS-IGNORE", default_value = "")]
    pub paths_ignore: String,

    /// Enable auto-merge with this method (MERGE, REBASE or SQUASH)
    #[arg(long, env = "INPUT_MERGE-METHOD", default_value = "")]
    pub merge_method: String,
}

/// Validated run configuration
#[derive(Debug, Clone)]
pub struct Inputs {
    /// Individual reviewers, in the order given
    pub reviewers: Vec<String>,
    /// Team reviewers (slugs), in the order given
    pub team_reviewers: Vec<String>,
    /// Extra labels added after the default label
    pub labels: Vec<String>,
    /// Base branch override
    pub base_branch: Option<String>,
    /// Pull request target branch override
    pub target_branch: Option<String>,
    /// Release channel to follow
    pub release_channel: ReleaseChannel,
    /// Pull request title template
    pub pr_title_template: String,
    /// Embed the distribution checksum in the wrapper properties
    pub set_distribution_checksum: bool,
    /// Custom distribution base URL
    pub distributions_base_url: Option<Url>,
    /// Include globs
    pub paths: Vec<String>,
    /// Ignore globs
    pub paths_ignore: Vec<String>,
    /// Auto-merge method, if any
    pub merge_method: Option<MergeMethod>,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            reviewers: Vec::new(),
            team_reviewers: Vec::new(),
            labels: Vec::new(),
            base_branch: None,
            target_branch: None,
            release_channel: ReleaseChannel::Stable,
            pr_title_template: DEFAULT_PR_TITLE_TEMPLATE.to_string(),
            set_distribution_checksum: true,
            distributions_base_url: None,
            paths: Vec::new(),
            paths_ignore: Vec::new(),
            merge_method: None,
        }
    }
}

impl TryFrom<RawInputs> for Inputs {
    type Error = Error;

    fn try_from(raw: RawInputs) -> Result<Self> {
        let distributions_base_url = non_empty(&raw.distributions_base_url)
            .map(|u| {
                Url::parse(&u)
                    .map_err(|e| Error::Config(format!("invalid distributions-base-url {u}: {e}")))
            })
            .transpose()?;

        let merge_method = non_empty(&raw.merge_method)
            .map(|m| m.parse::<MergeMethod>())
            .transpose()?;

        let pr_title_template = non_empty(&raw.pr_title_template)
            .unwrap_or_else(|| DEFAULT_PR_TITLE_TEMPLATE.to_string());

        Ok(Self {
            reviewers: parse_names(&raw.reviewers),
            team_reviewers: parse_names(&raw.team_reviewers),
            labels: parse_labels(&raw.labels),
            base_branch: non_empty(&raw.base_branch),
            target_branch: non_empty(&raw.target_branch),
            release_channel: raw.release_channel.trim().parse()?,
            pr_title_template,
            set_distribution_checksum: parse_checksum_flag(&raw.set_distribution_checksum),
            distributions_base_url,
            paths: parse_paths(&raw.paths),
            paths_ignore: parse_paths(&raw.paths_ignore),
            merge_method,
        })
    }
}

/// Split a list of names on commas and any whitespace
pub fn parse_names(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Split a list of labels on commas and newlines (labels may contain spaces)
pub fn parse_labels(value: &str) -> Vec<String> {
    split_lines_and_commas(value)
}

/// Split a list of globs on commas and newlines (globs may contain spaces)
pub fn parse_paths(value: &str) -> Vec<String> {
    split_lines_and_commas(value)
}

fn split_lines_and_commas(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Only the string `false` (any case) disables the checksum
pub fn parse_checksum_flag(value: &str) -> bool {
    !value.trim().eq_ignore_ascii_case("false")
}

/// Parse an `owner/repo` slug
pub fn parse_repository(slug: &str) -> Result<RepoConfig> {
    match slug.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok(RepoConfig {
                owner: owner.to_string(),
                repo: repo.to_string(),
            })
        }
        _ => Err(Error::Config(format!(
            "invalid repository {slug:?}, expected owner/repo"
        ))),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
