//! Parsing of `gradle-wrapper.properties`

use crate::error::{Error, Result};
use crate::types::DistributionType;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static DISTRIBUTION_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^distributionUrl=.*/gradle-(?P<version>[^/]+)-(?P<dist>[^-/.]+)\.zip$")
        .expect("distribution URL pattern is valid")
});

/// A parsed wrapper: where it lives and what it currently points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperDescriptor {
    path: PathBuf,
    base_dir: PathBuf,
    version: String,
    distribution_type: DistributionType,
}

impl WrapperDescriptor {
    /// Read and parse a wrapper properties file
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(Error::InvalidPath(path.to_path_buf()));
        }

        let props = std::fs::read_to_string(path)?;
        Self::from_properties(path, &props)
    }

    /// Parse already-loaded properties content for `path`
    pub fn from_properties(path: &Path, props: &str) -> Result<Self> {
        if !path.is_absolute() {
            return Err(Error::InvalidPath(path.to_path_buf()));
        }

        let (version, dist) = props
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("distributionUrl="))
            .find_map(|line| {
                DISTRIBUTION_URL.captures(line).map(|caps| {
                    (caps["version"].to_string(), caps["dist"].to_string())
                })
            })
            .ok_or_else(|| Error::MalformedWrapperFile(path.to_path_buf()))?;

        let distribution_type = dist
            .parse::<DistributionType>()
            .map_err(|_| Error::MalformedWrapperFile(path.to_path_buf()))?;

        // <base>/gradle/wrapper/gradle-wrapper.properties
        let base_dir = path
            .ancestors()
            .nth(3)
            .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?
            .to_path_buf();

        debug!(
            "Wrapper at {}: version {version}, distribution {distribution_type}",
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            version,
            distribution_type,
        })
    }

    /// Absolute path of the properties file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Project directory owning the wrapper
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Gradle version the wrapper currently pins
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Distribution type the wrapper currently uses
    pub const fn distribution_type(&self) -> DistributionType {
        self.distribution_type
    }

    /// Path of the wrapper JAR next to the properties file
    pub fn jar_path(&self) -> PathBuf {
        self.path.with_file_name("gradle-wrapper.jar")
    }
}

/// Distribution URL below a custom base, e.g. `<base>/gradle-8.10-bin.zip`
pub fn distribution_url(base: &Url, version: &str, distribution_type: DistributionType) -> String {
    format!(
        "{}/gradle-{version}-{distribution_type}.zip",
        base.as_str().trim_end_matches('/')
    )
}
