//! Pull request title and body

use crate::types::{DistributionType, Release};
use std::collections::BTreeSet;

/// Placeholder for the version the wrappers were upgraded from
pub const SOURCE_VERSION_PLACEHOLDER: &str = "%sourceVersion%";

/// Placeholder for the version the wrappers were upgraded to
pub const TARGET_VERSION_PLACEHOLDER: &str = "%targetVersion%";

/// Rendered in place of the source version when it is not unique
pub const UNKNOWN_SOURCE_VERSION: &str = "undefined";

const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

const FOOTER: &str = "🤖 This PR has been created by the [Update Gradle Wrapper](https://github.com/gradle-update/update-gradle-wrapper-action) action.

<details>
<summary>Need help? 🤔</summary>
<br />

If something doesn't look right with this PR please file an issue [here](https://github.com/gradle-update/update-gradle-wrapper-action/issues).
</details>";

/// Rendered pull request text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestText {
    /// Pull request title
    pub title: String,
    /// Markdown body
    pub body: String,
}

/// Substitute `%sourceVersion%` and `%targetVersion%` in `template`
pub fn replace_version_placeholders(
    template: &str,
    source_version: Option<&str>,
    target_version: &str,
) -> String {
    template
        .replace(
            SOURCE_VERSION_PLACEHOLDER,
            source_version.unwrap_or(UNKNOWN_SOURCE_VERSION),
        )
        .replace(TARGET_VERSION_PLACEHOLDER, target_version)
}

/// Build the pull request title and body for an update run
pub fn compose(
    title_template: &str,
    distribution_types: &BTreeSet<DistributionType>,
    release: &Release,
    source_version: Option<&str>,
) -> PullRequestText {
    let title = replace_version_placeholders(title_template, source_version, &release.version);

    let summary = format!(
        "{title}.\n\nRead the release notes: https://docs.gradle.org/{}/release-notes.html",
        release.version
    );

    let body = [
        summary,
        checksum_block(distribution_types, release),
        FOOTER.to_string(),
    ]
    .join(BLOCK_SEPARATOR);

    PullRequestText { title, body }
}

fn checksum_block(distribution_types: &BTreeSet<DistributionType>, release: &Release) -> String {
    let mut block = format!(
        "The checksums of the Wrapper JAR and the distribution binary have been successfully verified.\n\n\
         - Gradle release: `{}`\n",
        release.version
    );

    if distribution_types.contains(&DistributionType::Bin) {
        block.push_str(&format!(
            "- Distribution (-bin) zip checksum: `{}`\n",
            release.bin_checksum
        ));
    }
    if distribution_types.contains(&DistributionType::All) {
        block.push_str(&format!(
            "- Distribution (-all) zip checksum: `{}`\n",
            release.all_checksum
        ));
    }

    block.push_str(&format!(
        "- Wrapper JAR Checksum: `{}`\n\n\
         You can find the reference checksum values at https://gradle.org/release-checksums/",
        release.wrapper_checksum
    ));

    block
}
