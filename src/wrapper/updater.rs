//! Wrapper regeneration and verification
//!
//! Regeneration runs `gradle wrapper` in the project directory.
//! Verification checks the regenerated JAR against the published checksum
//! and smoke-runs the new `gradlew` script.

use crate::error::{Error, Result};
use crate::types::DistributionType;
use crate::wrapper::WRAPPER_PROPERTIES;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Regenerates and verifies one wrapper
#[async_trait]
pub trait WrapperUpdateRunner: Send + Sync {
    /// Regenerate the wrapper in `base_dir` for `target_version`
    async fn update(
        &self,
        base_dir: &Path,
        target_version: &str,
        distribution_type: DistributionType,
        checksum: Option<&str>,
        distribution_url: Option<&str>,
    ) -> Result<()>;

    /// Verify the regenerated wrapper in `base_dir`
    async fn verify(&self, base_dir: &Path, expected_jar_checksum: &str) -> Result<()>;
}

/// Runner invoking a `gradle` executable
pub struct GradleRunner {
    program: PathBuf,
}

impl Default for GradleRunner {
    fn default() -> Self {
        Self::with_program("gradle")
    }
}

impl GradleRunner {
    /// Use a specific gradle executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl WrapperUpdateRunner for GradleRunner {
    async fn update(
        &self,
        base_dir: &Path,
        target_version: &str,
        distribution_type: DistributionType,
        checksum: Option<&str>,
        distribution_url: Option<&str>,
    ) -> Result<()> {
        let mut args = vec![
            "wrapper",
            "--gradle-version",
            target_version,
            "--distribution-type",
            distribution_type.as_str(),
        ];

        // Written to gradle-wrapper.properties and checked on first download
        if let Some(sum) = checksum {
            args.extend(["--gradle-distribution-sha256-sum", sum]);
        }

        if let Some(url) = distribution_url {
            args.extend(["--gradle-distribution-url", url]);
        }

        debug!("{} {} (in {})", self.program.display(), args.join(" "), base_dir.display());

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(base_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::Update(format!("unable to run {}: {e}", self.program.display())))?;

        if !output.status.success() {
            return Err(Error::Update(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(())
    }

    async fn verify(&self, base_dir: &Path, expected_jar_checksum: &str) -> Result<()> {
        let jar = base_dir
            .join(WRAPPER_PROPERTIES)
            .with_file_name("gradle-wrapper.jar");
        debug!("Verifying SHA-256 for: {}", jar.display());

        let sum = sha256_file(&jar).await?;
        debug!("SHA-256: {sum}");

        if sum != expected_jar_checksum {
            return Err(Error::Verification(format!(
                "SHA-256 Wrapper jar mismatch (expected {expected_jar_checksum}, got {sum})"
            )));
        }

        // A corrupt or mismatching distribution makes the wrapper fail here
        let output = Command::new("./gradlew")
            .arg("--help")
            .current_dir(base_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::Verification(format!("unable to run gradlew: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mismatch: Vec<&str> = stderr.lines().filter(|l| l.contains("checksum:")).collect();
            let details = if mismatch.is_empty() {
                stderr.trim().to_string()
            } else {
                mismatch.join("\n")
            };
            return Err(Error::Verification(format!(
                "Gradle binary verification error\n\n{details}"
            )));
        }

        Ok(())
    }
}

/// Hex-encoded SHA-256 of a file
pub async fn sha256_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
