//! Gradle release metadata
//!
//! Resolves the target release and its published checksums from
//! `services.gradle.org`.

use crate::error::{Error, Result};
use crate::types::Release;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Default Gradle services host
pub const GRADLE_SERVICES_URL: &str = "https://services.gradle.org";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Release channel to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseChannel {
    /// Latest stable release
    Stable,
    /// Latest release candidate
    ReleaseCandidate,
}

impl ReleaseChannel {
    /// Path of the version endpoint for this channel
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Stable => "/versions/current",
            Self::ReleaseCandidate => "/versions/release-candidate",
        }
    }
}

impl fmt::Display for ReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => f.write_str("stable"),
            Self::ReleaseCandidate => f.write_str("release-candidate"),
        }
    }
}

impl FromStr for ReleaseChannel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stable" => Ok(Self::Stable),
            "release-candidate" => Ok(Self::ReleaseCandidate),
            other => Err(Error::Config(format!(
                "release-channel must be stable or release-candidate (got {other:?})"
            ))),
        }
    }
}

/// Source of target release information
#[async_trait]
pub trait ReleaseResolver: Send + Sync {
    /// Fetch the latest release on a channel, with all its checksums
    async fn fetch(&self, channel: ReleaseChannel) -> Result<Release>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionData {
    version: String,
    checksum_url: String,
    wrapper_checksum_url: String,
}

/// Release resolver backed by the Gradle versions API
pub struct GradleReleases {
    client: Client,
    base_url: String,
}

impl GradleReleases {
    /// Create a resolver against a services host (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gradlew-update/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::ReleaseFetch(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ReleaseFetch(format!("GET {url} returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ReleaseFetch(format!("GET {url}: {e}")))?;
        Ok(body.trim().to_string())
    }
}

#[async_trait]
impl ReleaseResolver for GradleReleases {
    async fn fetch(&self, channel: ReleaseChannel) -> Result<Release> {
        let url = format!("{}{}", self.base_url, channel.endpoint());
        let body = self.fetch_text(&url).await?;

        let data: VersionData = serde_json::from_str(&body)
            .map_err(|e| Error::ReleaseFetch(format!("no {channel} release available: {e}")))?;
        debug!("Release {} (checksum url {})", data.version, data.checksum_url);

        let bin_checksum = self.fetch_text(&data.checksum_url).await?;

        let all_checksum_url = data.checksum_url.replace("-bin.zip", "-all.zip");
        let all_checksum = self.fetch_text(&all_checksum_url).await?;

        let wrapper_checksum = self.fetch_text(&data.wrapper_checksum_url).await?;

        Ok(Release {
            version: data.version,
            bin_checksum,
            all_checksum,
            wrapper_checksum,
        })
    }
}
