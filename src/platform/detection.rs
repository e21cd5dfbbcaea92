//! Repository detection from an `owner/repo` slug or a git remote URL

use crate::config::parse_repository;
use crate::error::{Error, Result};
use crate::types::RepoConfig;
use regex::Regex;
use std::sync::LazyLock;

static RE_SSH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:ssh://)?git@[^:/]+[:/](.+?)(?:\.git)?/?$").expect("valid regex"));
static RE_HTTPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/]+/(.+?)(?:\.git)?/?$").expect("valid regex"));

/// Resolve the target repository
///
/// An explicit slug (e.g. `GITHUB_REPOSITORY`) wins; otherwise the remote
/// URL is parsed.
pub fn detect_repository(slug: Option<&str>, remote_url: Option<&str>) -> Result<RepoConfig> {
    if let Some(slug) = slug.filter(|s| !s.trim().is_empty()) {
        return parse_repository(slug);
    }

    let url = remote_url.ok_or_else(|| {
        Error::Config("unable to detect repository: set GITHUB_REPOSITORY or --repository".into())
    })?;
    parse_remote_url(url)
}

/// Parse owner/repo from an SSH or HTTPS remote URL
pub fn parse_remote_url(url: &str) -> Result<RepoConfig> {
    let path = RE_SSH
        .captures(url)
        .or_else(|| RE_HTTPS.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Config(format!("cannot parse remote URL: {url}")))?;

    parse_repository(path)
}
