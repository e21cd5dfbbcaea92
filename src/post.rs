//! Post phase: report reviewer assignment failures
//!
//! Runs as its own process after the main phase. It only reads what the
//! main phase recorded and never fails the job.

use crate::auth;
use crate::error::Result;
use crate::git::Git;
use crate::platform::GitHubApi;
use crate::state::{RunState, StateStore};
use crate::types::PullRequestData;
use tracing::{debug, info};

/// Comment listing reviewers and teams that could not be assigned
///
/// `None` when there is nothing to report.
pub fn errored_reviewers_comment(reviewers: &[String], teams: &[String]) -> Option<String> {
    let usernames: String = reviewers
        .iter()
        .chain(teams)
        .map(|name| format!("- @{name}\n"))
        .collect();

    if usernames.is_empty() {
        return None;
    }

    Some(format!(
        "Unable to set all the PR reviewers, check the following usernames are correct:\n\n\
         {usernames}\n\n\
         Please refer to the documentation for the \
         [`reviewers`](https://github.com/gradle-update/update-gradle-wrapper-action#reviewers) \
         and [`team-reviewers`](https://github.com/gradle-update/update-gradle-wrapper-action#team-reviewers) \
         input parameters.\n\n\
         ---\n\n\
         🤖 This is an automatic comment by the Update Gradle Wrapper action."
    ))
}

/// The reporting phase
pub struct PostPhase<'a> {
    github: &'a dyn GitHubApi,
    state: &'a dyn StateStore,
    git_cleanup: Option<(&'a dyn Git, String)>,
}

impl<'a> PostPhase<'a> {
    /// Create a post phase reading from `state`
    pub const fn new(github: &'a dyn GitHubApi, state: &'a dyn StateStore) -> Self {
        Self {
            github,
            state,
            git_cleanup: None,
        }
    }

    /// Also remove the git credentials configured for `server_url`
    #[must_use]
    pub fn with_git_cleanup(mut self, git: &'a dyn Git, server_url: impl Into<String>) -> Self {
        self.git_cleanup = Some((git, server_url.into()));
        self
    }

    /// Clean up and comment on `pr` if any reviewer could not be assigned
    pub async fn run(&self, pr: &PullRequestData) {
        self.cleanup().await;

        if let Err(e) = self.report_errored_reviewers(pr).await {
            debug!("Post action task failed");
            debug!("error: {e}");
        }
    }

    /// Remove git credentials; failures are only logged
    pub async fn cleanup(&self) {
        if let Some((git, server_url)) = &self.git_cleanup {
            if let Err(e) = auth::cleanup(*git, server_url).await {
                debug!("Unable to clean up git credentials: {e}");
            }
        }
    }

    async fn report_errored_reviewers(&self, pr: &PullRequestData) -> Result<()> {
        let state = RunState::new(self.state);
        let reviewers = state.errored_reviewers()?;
        let teams = state.errored_team_reviewers()?;

        let Some(body) = errored_reviewers_comment(&reviewers, &teams) else {
            debug!("All reviewers were assigned, nothing to report");
            return Ok(());
        };

        info!("Reporting errored reviewers on PR #{}", pr.number);
        self.github.create_comment(pr.number, &body).await
    }
}
