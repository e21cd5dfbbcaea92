//! Best-effort reviewer, label and auto-merge setup on the created PR
//!
//! Nothing here fails the run. Reviewers and teams are requested one name
//! at a time so that an unknown login cannot block the valid ones; the
//! names that could not be assigned are persisted for the post phase.

use crate::config::{Inputs, MergeMethod};
use crate::error::Error;
use crate::platform::GitHubApi;
use crate::state::RunState;
use std::fmt;
use tracing::{debug, info, warn};

/// Label always added to pull requests opened by this tool
pub const DEFAULT_LABEL: &str = "gradle-wrapper";

/// Color of [`DEFAULT_LABEL`] when it has to be created
pub const DEFAULT_LABEL_COLOR: &str = "02303A";

/// Description of [`DEFAULT_LABEL`] when it has to be created
pub const DEFAULT_LABEL_DESCRIPTION: &str = "Pull requests that update Gradle wrapper";

/// Why a single reviewer could not be assigned
#[derive(Debug)]
pub enum AssignmentFailure {
    /// The request itself failed (unknown identity, permissions, transport)
    Rejected(Error),
    /// The request succeeded but the name is not among the requested reviewers
    NotRequested,
}

impl fmt::Display for AssignmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(e) => write!(f, "request rejected: {e}"),
            Self::NotRequested => f.write_str("not in the requested reviewers"),
        }
    }
}

/// Outcome of assigning a list of reviewers
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Names now requested for review, in input order
    pub assigned: Vec<String>,
    /// Names that could not be assigned, in input order
    pub errored: Vec<String>,
}

impl AssignmentReport {
    /// Partition per-name results
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<(), AssignmentFailure>)>,
    {
        let mut report = Self::default();
        for (name, result) in results {
            match result {
                Ok(()) => report.assigned.push(name),
                Err(_) => report.errored.push(name),
            }
        }
        report
    }

    /// Whether every name was assigned
    pub fn is_complete(&self) -> bool {
        self.errored.is_empty()
    }
}

#[derive(Clone, Copy)]
enum ReviewerKind {
    User,
    Team,
}

impl ReviewerKind {
    const fn noun(self) -> &'static str {
        match self {
            Self::User => "reviewer",
            Self::Team => "team reviewer",
        }
    }
}

/// Assigns collaborators to a pull request and records partial failures
pub struct CollaboratorNotifier<'a> {
    github: &'a dyn GitHubApi,
    state: RunState<'a>,
}

impl<'a> CollaboratorNotifier<'a> {
    /// Create a notifier writing failures to `state`
    pub const fn new(github: &'a dyn GitHubApi, state: RunState<'a>) -> Self {
        Self { github, state }
    }

    /// Run the full post-creation setup for a pull request
    ///
    /// Order: default label, labels, reviewers, team reviewers, auto-merge.
    pub async fn notify(&self, pr_number: u64, inputs: &Inputs) {
        self.ensure_label(DEFAULT_LABEL).await;

        let mut labels = vec![DEFAULT_LABEL.to_string()];
        labels.extend(inputs.labels.iter().cloned());
        self.add_labels(pr_number, &labels).await;

        self.assign_reviewers(pr_number, &inputs.reviewers).await;
        self.assign_team_reviewers(pr_number, &inputs.team_reviewers)
            .await;

        if let Some(method) = inputs.merge_method {
            self.enable_auto_merge(pr_number, method).await;
        }
    }

    /// Request a review from each user, one request per name
    pub async fn assign_reviewers(&self, pr_number: u64, reviewers: &[String]) -> AssignmentReport {
        let report = self.assign(pr_number, reviewers, ReviewerKind::User).await;

        if !report.is_complete() {
            warn!(
                "Unable to set all the PR reviewers, check the following usernames are correct: {}",
                report.errored.join(", ")
            );
            if let Err(e) = self.state.set_errored_reviewers(&report.errored) {
                warn!("Unable to save errored reviewers: {e}");
            }
        }

        report
    }

    /// Request a review from each team, one request per team
    pub async fn assign_team_reviewers(&self, pr_number: u64, teams: &[String]) -> AssignmentReport {
        let report = self.assign(pr_number, teams, ReviewerKind::Team).await;

        if !report.is_complete() {
            warn!(
                "Unable to set all the PR team reviewers, check the following team names are correct: {}",
                report.errored.join(", ")
            );
            if let Err(e) = self.state.set_errored_team_reviewers(&report.errored) {
                warn!("Unable to save errored team reviewers: {e}");
            }
        }

        report
    }

    async fn assign(&self, pr_number: u64, names: &[String], kind: ReviewerKind) -> AssignmentReport {
        if names.is_empty() {
            info!("No {}s to add", kind.noun());
            return AssignmentReport::default();
        }

        info!("Requesting review from {}s: {}", kind.noun(), names.join(","));

        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let result = self.assign_one(pr_number, name, kind).await;
            if let Err(failure) = &result {
                warn!("Unable to set PR {} {name}: {failure}", kind.noun());
            }
            results.push((name.clone(), result));
        }

        AssignmentReport::from_results(results)
    }

    async fn assign_one(
        &self,
        pr_number: u64,
        name: &str,
        kind: ReviewerKind,
    ) -> Result<(), AssignmentFailure> {
        let requested = match kind {
            ReviewerKind::User => self.github.request_reviewer(pr_number, name).await,
            ReviewerKind::Team => self.github.request_team_reviewer(pr_number, name).await,
        }
        .map_err(AssignmentFailure::Rejected)?;

        debug!("Requested {}s: {requested:?}", kind.noun());

        if requested.iter().any(|r| r == name) {
            Ok(())
        } else {
            Err(AssignmentFailure::NotRequested)
        }
    }

    /// Make sure a label exists, creating it when missing
    ///
    /// Returns `false` when the label could neither be found nor created.
    pub async fn ensure_label(&self, name: &str) -> bool {
        match self.github.label_exists(name).await {
            Ok(true) => true,
            Ok(false) => match self
                .github
                .create_label(name, DEFAULT_LABEL_COLOR, DEFAULT_LABEL_DESCRIPTION)
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    warn!("Unable to create label \"{name}\": {e}");
                    false
                }
            },
            Err(e) => {
                debug!("Unable to look up label {name}: {e}");
                false
            }
        }
    }

    /// Add labels in a single request; failures are only logged
    pub async fn add_labels(&self, pr_number: u64, labels: &[String]) {
        if labels.is_empty() {
            info!("No labels to add");
            return;
        }

        info!("Adding labels: {}", labels.join(","));

        if let Err(e) = self.github.add_labels(pr_number, labels).await {
            warn!("Unable to add all labels to PR: {e}");
        }
    }

    /// Enable auto-merge; failures are only logged
    pub async fn enable_auto_merge(&self, pr_number: u64, method: MergeMethod) {
        info!("Enabling auto-merge ({method}) on PR #{pr_number}");

        if let Err(e) = self.github.enable_auto_merge(pr_number, method).await {
            warn!("Unable to enable auto-merge [{method}] for PR {pr_number}: {e}");
        }
    }
}
