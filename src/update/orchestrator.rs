//! Main phase: update every wrapper and open one pull request
//!
//! The run is a fixed sequence of stages. Each stage either advances to the
//! next one, finishes early with an [`Outcome`], or fails the whole run:
//!
//! ```text
//! Init -> ReleaseResolved -> BranchPrepared -> Aggregated -> Finished
//!                 \                 \              \
//!                  +-> Finished      +-> Finished   +-> Finished
//!                   (branch exists,   (up-to-date)
//!                    no wrappers)
//! ```

use crate::auth::GitAuth;
use crate::config::Inputs;
use crate::error::{Error, Result};
use crate::git::{Git, commit_message};
use crate::platform::GitHubApi;
use crate::pr::{CollaboratorNotifier, compose};
use crate::release::ReleaseResolver;
use crate::state::{RunState, StateStore};
use crate::types::{CommitRecord, DistributionType, PullRequestData, Release};
use crate::update::{ProgressCallback, Step, WrapperStatus};
use crate::wrapper::{WrapperDescriptor, WrapperLocator, WrapperUpdateRunner, distribution_url};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Prefix of the branch holding the update commits
pub const BRANCH_PREFIX: &str = "gradlew-update-";

/// Committer name used for update commits
pub const COMMITTER_NAME: &str = "gradle-update-robot";

/// Committer email used for update commits
pub const COMMITTER_EMAIL: &str = "gradle-update-robot@regolo.cc";

/// Update branch for a target version
pub fn branch_name(version: &str) -> String {
    format!("{BRANCH_PREFIX}{version}")
}

/// How a main-phase run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// An update branch for the target version already exists
    BranchExists {
        /// Name of the existing branch
        branch: String,
    },
    /// No wrapper matched the path filters
    NoWrappers,
    /// Every wrapper already pins the target version
    UpToDate {
        /// Target version
        version: String,
    },
    /// The update branch was pushed and a pull request opened
    PullRequestCreated(PullRequestData),
}

/// Summary of the commits produced by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOutcome {
    /// Distribution types of the updated wrappers
    pub distribution_types: BTreeSet<DistributionType>,
    /// Original version, only when exactly one wrapper was updated
    pub source_version: Option<String>,
}

impl AggregateOutcome {
    /// Aggregate commit records; `None` when nothing was committed
    pub fn from_commits(commits: &[CommitRecord]) -> Option<Self> {
        if commits.is_empty() {
            return None;
        }

        let source_version = match commits {
            [only] => Some(only.source_version.clone()),
            _ => None,
        };

        Some(Self {
            distribution_types: commits.iter().map(|c| c.distribution_type).collect(),
            source_version,
        })
    }
}

/// External collaborators of the main phase
#[derive(Clone, Copy)]
pub struct Services<'a> {
    /// Release metadata
    pub releases: &'a dyn ReleaseResolver,
    /// GitHub API
    pub github: &'a dyn GitHubApi,
    /// Local repository
    pub git: &'a dyn Git,
    /// Wrapper regeneration and verification
    pub runner: &'a dyn WrapperUpdateRunner,
    /// Cross-phase state
    pub state: &'a dyn StateStore,
}

enum Stage {
    Init,
    ReleaseResolved(Release),
    BranchPrepared {
        release: Release,
        branch: String,
        wrappers: Vec<WrapperDescriptor>,
    },
    Aggregated {
        release: Release,
        branch: String,
        commits: Vec<CommitRecord>,
    },
    Finished(Outcome),
}

/// Drives the main phase
pub struct UpdateOrchestrator<'a> {
    services: Services<'a>,
    inputs: &'a Inputs,
    locator: &'a WrapperLocator,
    git_auth: Option<GitAuth>,
}

impl<'a> UpdateOrchestrator<'a> {
    /// Create an orchestrator
    pub const fn new(services: Services<'a>, inputs: &'a Inputs, locator: &'a WrapperLocator) -> Self {
        Self {
            services,
            inputs,
            locator,
            git_auth: None,
        }
    }

    /// Configure git credentials before touching the remote
    #[must_use]
    pub fn with_git_auth(mut self, auth: GitAuth) -> Self {
        self.git_auth = Some(auth);
        self
    }

    /// Run the main phase to completion
    ///
    /// The main-phase flag is persisted before anything else so that a
    /// failed run is still followed by the post phase.
    pub async fn run(&self, progress: &dyn ProgressCallback) -> Result<Outcome> {
        RunState::new(self.services.state).set_main_phase_executed()?;

        let mut stage = Stage::Init;
        loop {
            stage = match self.advance(stage, progress).await {
                Ok(Stage::Finished(outcome)) => {
                    progress.on_step(Step::Complete).await;
                    return Ok(outcome);
                }
                Ok(next) => next,
                Err(e) => {
                    progress.on_error(&e).await;
                    return Err(e);
                }
            };
        }
    }

    async fn advance(&self, stage: Stage, progress: &dyn ProgressCallback) -> Result<Stage> {
        match stage {
            Stage::Init => self.resolve_release(progress).await,
            Stage::ReleaseResolved(release) => self.prepare_branch(release, progress).await,
            Stage::BranchPrepared {
                release,
                branch,
                wrappers,
            } => self.update_wrappers(release, branch, &wrappers, progress).await,
            Stage::Aggregated {
                release,
                branch,
                commits,
            } => self.publish(&release, &branch, &commits, progress).await,
            Stage::Finished(outcome) => Ok(Stage::Finished(outcome)),
        }
    }

    async fn resolve_release(&self, progress: &dyn ProgressCallback) -> Result<Stage> {
        if let Some(auth) = &self.git_auth {
            auth.setup(self.services.git).await?;
        }

        progress.on_step(Step::ResolvingRelease).await;

        let channel = self.inputs.release_channel;
        let release = self.services.releases.fetch(channel).await?;
        info!("Latest release: {} (channel {channel})", release.version);

        Ok(Stage::ReleaseResolved(release))
    }

    async fn prepare_branch(&self, release: Release, progress: &dyn ProgressCallback) -> Result<Stage> {
        progress.on_step(Step::CheckingBranch).await;

        let branch = branch_name(&release.version);
        if self.services.github.branch_exists(&branch).await? {
            info!("Found an existing ref, stopping here.");
            warn!(
                "A pull request already exists that updates Gradle Wrapper to {}.",
                release.version
            );
            return Ok(Stage::Finished(Outcome::BranchExists { branch }));
        }

        let paths = self
            .locator
            .locate(&self.inputs.paths, &self.inputs.paths_ignore)?;
        debug!("Wrappers: {paths:?}");

        if paths.is_empty() {
            warn!("Unable to find Gradle Wrapper files in this project.");
            return Ok(Stage::Finished(Outcome::NoWrappers));
        }

        let wrappers = paths
            .iter()
            .map(WrapperDescriptor::parse)
            .collect::<Result<Vec<_>>>()?;
        debug!("Wrappers count: {}", wrappers.len());

        progress.on_step(Step::PreparingBranch).await;

        let git = self.services.git;
        git.config("user.name", COMMITTER_NAME).await?;
        git.config("user.email", COMMITTER_EMAIL).await?;

        let base_branch = match &self.inputs.base_branch {
            Some(branch) => branch.clone(),
            None => self.services.github.repo_default_branch().await?,
        };
        debug!("Base branch: {base_branch}");

        git.fetch().await?;
        git.checkout(&base_branch)
            .await
            .map_err(|_| Error::InvalidBaseBranch(base_branch.clone()))?;

        let head = git.parse_head().await?;
        debug!("Head for branch {base_branch} is at {head}");

        git.checkout_create_branch(&branch, &head).await?;
        progress
            .on_message(&format!("Created branch {branch} from {base_branch}"))
            .await;

        Ok(Stage::BranchPrepared {
            release,
            branch,
            wrappers,
        })
    }

    async fn update_wrappers(
        &self,
        release: Release,
        branch: String,
        wrappers: &[WrapperDescriptor],
        progress: &dyn ProgressCallback,
    ) -> Result<Stage> {
        progress.on_step(Step::UpdatingWrappers).await;

        let mut commits = Vec::new();
        for wrapper in wrappers {
            progress.on_wrapper_start(wrapper).await;

            let status = match self.update_wrapper(wrapper, &release).await? {
                Some(record) => {
                    let status = WrapperStatus::Committed {
                        from: record.source_version.clone(),
                        files: record.files.len(),
                    };
                    commits.push(record);
                    status
                }
                None if wrapper.version() == release.version => WrapperStatus::UpToDate,
                None => WrapperStatus::Unchanged,
            };

            progress.on_wrapper_done(wrapper.path(), &status).await;
        }

        if commits.is_empty() {
            warn!(
                "Gradle Wrapper is already up-to-date (version {})!",
                release.version
            );
            return Ok(Stage::Finished(Outcome::UpToDate {
                version: release.version,
            }));
        }

        let files: usize = commits.iter().map(|c| c.files.len()).sum();
        debug!(
            "Have added {} commits for a total of {files} files",
            commits.len()
        );

        Ok(Stage::Aggregated {
            release,
            branch,
            commits,
        })
    }

    /// Update, verify and commit one wrapper; `None` when nothing changed
    async fn update_wrapper(
        &self,
        wrapper: &WrapperDescriptor,
        release: &Release,
    ) -> Result<Option<CommitRecord>> {
        debug!("Current Wrapper version: {}", wrapper.version());

        if wrapper.version() == release.version {
            info!("Wrapper is already up-to-date");
            return Ok(None);
        }

        let distribution_type = wrapper.distribution_type();
        let checksum = self
            .inputs
            .set_distribution_checksum
            .then(|| release.checksum_for(distribution_type));
        let url = self
            .inputs
            .distributions_base_url
            .as_ref()
            .map(|base| distribution_url(base, &release.version, distribution_type));

        let runner = self.services.runner;
        let git = self.services.git;
        let base_dir = wrapper.base_dir();

        runner
            .update(base_dir, &release.version, distribution_type, checksum, url.as_deref())
            .await?;

        let mut files = git.diff_names_only().await?;
        debug!("Modified files: {files:?}");

        if files.is_empty() {
            info!("Nothing to update for Wrapper at {}", wrapper.path().display());
            return Ok(None);
        }

        // Second pass regenerates the JAR and scripts with the new version
        runner
            .update(base_dir, &release.version, distribution_type, checksum, url.as_deref())
            .await?;
        files = git.diff_names_only().await?;
        debug!("Modified files after second update: {files:?}");

        runner.verify(base_dir, &release.wrapper_checksum).await?;

        git.add(&files).await?;
        git.commit(&commit_message(wrapper.version(), &release.version))
            .await?;

        Ok(Some(CommitRecord {
            files,
            target_version: release.version.clone(),
            source_version: wrapper.version().to_string(),
            distribution_type,
        }))
    }

    async fn publish(
        &self,
        release: &Release,
        branch: &str,
        commits: &[CommitRecord],
        progress: &dyn ProgressCallback,
    ) -> Result<Stage> {
        let Some(aggregate) = AggregateOutcome::from_commits(commits) else {
            return Ok(Stage::Finished(Outcome::UpToDate {
                version: release.version.clone(),
            }));
        };

        progress.on_step(Step::Pushing).await;
        self.services.git.push(branch).await?;

        progress.on_step(Step::CreatingPullRequest).await;
        let text = compose(
            &self.inputs.pr_title_template,
            &aggregate.distribution_types,
            release,
            aggregate.source_version.as_deref(),
        );

        let github = self.services.github;
        let target_branch = match &self.inputs.target_branch {
            Some(branch) => branch.clone(),
            None => github.repo_default_branch().await?,
        };
        debug!("Target branch: {target_branch}");

        let pr = github
            .create_pull_request(branch, &target_branch, &text.title, &text.body)
            .await?;
        info!("Created a Pull Request at {}", pr.url);
        progress.on_pr_created(&pr).await;

        let state = RunState::new(self.services.state);
        state.set_pull_request(&pr)?;

        progress.on_step(Step::Notifying).await;
        CollaboratorNotifier::new(github, state)
            .notify(pr.number, self.inputs)
            .await;

        Ok(Stage::Finished(Outcome::PullRequestCreated(pr)))
    }
}
