//! Test data factories

#![allow(dead_code)]

use gradlew_update::types::{DistributionType, Release};
use std::path::{Path, PathBuf};

/// Release with recognizable checksums
pub fn make_release(version: &str) -> Release {
    Release {
        version: version.to_string(),
        bin_checksum: format!("bin-sum-{version}"),
        all_checksum: format!("all-sum-{version}"),
        wrapper_checksum: format!("jar-sum-{version}"),
    }
}

/// Properties content pinning `version` with `distribution_type`
pub fn wrapper_properties(version: &str, distribution_type: DistributionType) -> String {
    format!(
        "distributionBase=GRADLE_USER_HOME\n\
         distributionPath=wrapper/dists\n\
         distributionUrl=https\\://services.gradle.org/distributions/gradle-{version}-{distribution_type}.zip\n\
         zipStoreBase=GRADLE_USER_HOME\n\
         zipStorePath=wrapper/dists\n"
    )
}

/// Write `<root>/<project>/gradle/wrapper/gradle-wrapper.properties`
///
/// Returns the project directory. An empty `project` writes at `root`.
pub fn write_wrapper(
    root: &Path,
    project: &str,
    version: &str,
    distribution_type: DistributionType,
) -> PathBuf {
    let base = if project.is_empty() {
        root.to_path_buf()
    } else {
        root.join(project)
    };
    let dir = base.join("gradle/wrapper");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("gradle-wrapper.properties"),
        wrapper_properties(version, distribution_type),
    )
    .unwrap();
    base
}
