//! Mock GitHub API for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use gradlew_update::config::MergeMethod;
use gradlew_update::error::{Error, Result};
use gradlew_update::platform::GitHubApi;
use gradlew_update::types::PullRequestData;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `create_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `create_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLabelCall {
    pub name: String,
    pub color: String,
    pub description: String,
}

/// Hand-written mock of [`GitHubApi`]
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Per-name reviewer behavior (accepted, rejected, silently ignored)
/// - Error injection for failure path testing
pub struct MockGitHub {
    default_branch: String,
    next_pr_number: AtomicU64,
    existing_branches: Mutex<HashSet<String>>,
    existing_labels: Mutex<HashSet<String>>,
    rejected_reviewers: Mutex<HashSet<String>>,
    ignored_reviewers: Mutex<HashSet<String>>,
    // Call tracking
    default_branch_calls: AtomicU64,
    branch_exists_calls: Mutex<Vec<String>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    reviewer_calls: Mutex<Vec<(u64, String)>>,
    team_reviewer_calls: Mutex<Vec<(u64, String)>>,
    add_labels_calls: Mutex<Vec<(u64, Vec<String>)>>,
    create_label_calls: Mutex<Vec<CreateLabelCall>>,
    comment_calls: Mutex<Vec<CreateCommentCall>>,
    auto_merge_calls: Mutex<Vec<(u64, MergeMethod)>>,
    // Error injection
    error_on_create_pr: Mutex<Option<String>>,
    error_on_label_lookup: Mutex<Option<String>>,
    error_on_add_labels: Mutex<Option<String>>,
    error_on_comment: Mutex<Option<String>>,
    error_on_auto_merge: Mutex<Option<String>>,
}

impl Default for MockGitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGitHub {
    /// Mock whose default branch is `main`
    pub fn new() -> Self {
        Self::with_default_branch("main")
    }

    /// Mock with a specific default branch
    pub fn with_default_branch(branch: &str) -> Self {
        Self {
            default_branch: branch.to_string(),
            next_pr_number: AtomicU64::new(1),
            existing_branches: Mutex::new(HashSet::new()),
            existing_labels: Mutex::new(HashSet::new()),
            rejected_reviewers: Mutex::new(HashSet::new()),
            ignored_reviewers: Mutex::new(HashSet::new()),
            default_branch_calls: AtomicU64::new(0),
            branch_exists_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            reviewer_calls: Mutex::new(Vec::new()),
            team_reviewer_calls: Mutex::new(Vec::new()),
            add_labels_calls: Mutex::new(Vec::new()),
            create_label_calls: Mutex::new(Vec::new()),
            comment_calls: Mutex::new(Vec::new()),
            auto_merge_calls: Mutex::new(Vec::new()),
            error_on_create_pr: Mutex::new(None),
            error_on_label_lookup: Mutex::new(None),
            error_on_add_labels: Mutex::new(None),
            error_on_comment: Mutex::new(None),
            error_on_auto_merge: Mutex::new(None),
        }
    }

    // === Setup ===

    /// Pretend `refs/heads/<branch>` exists on the remote
    pub fn add_branch(&self, branch: &str) {
        self.existing_branches
            .lock()
            .unwrap()
            .insert(branch.to_string());
    }

    /// Pretend a label already exists
    pub fn add_label(&self, name: &str) {
        self.existing_labels.lock().unwrap().insert(name.to_string());
    }

    /// Requests for this reviewer or team fail with an API error
    pub fn reject_reviewer(&self, name: &str) {
        self.rejected_reviewers
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    /// Requests for this reviewer or team succeed without requesting it
    pub fn ignore_reviewer(&self, name: &str) {
        self.ignored_reviewers
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    // === Error injection ===

    /// Make `create_pull_request` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `label_exists` return a non-404 error
    pub fn fail_label_lookup(&self, msg: &str) {
        *self.error_on_label_lookup.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_labels` return an error
    pub fn fail_add_labels(&self, msg: &str) {
        *self.error_on_add_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_comment` return an error
    pub fn fail_comment(&self, msg: &str) {
        *self.error_on_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `enable_auto_merge` return an error
    pub fn fail_auto_merge(&self, msg: &str) {
        *self.error_on_auto_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification ===

    pub fn get_default_branch_calls(&self) -> u64 {
        self.default_branch_calls.load(Ordering::SeqCst)
    }

    pub fn get_branch_exists_calls(&self) -> Vec<String> {
        self.branch_exists_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_reviewer_calls(&self) -> Vec<(u64, String)> {
        self.reviewer_calls.lock().unwrap().clone()
    }

    pub fn get_team_reviewer_calls(&self) -> Vec<(u64, String)> {
        self.team_reviewer_calls.lock().unwrap().clone()
    }

    pub fn get_add_labels_calls(&self) -> Vec<(u64, Vec<String>)> {
        self.add_labels_calls.lock().unwrap().clone()
    }

    pub fn get_create_label_calls(&self) -> Vec<CreateLabelCall> {
        self.create_label_calls.lock().unwrap().clone()
    }

    pub fn get_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.comment_calls.lock().unwrap().clone()
    }

    pub fn get_auto_merge_calls(&self) -> Vec<(u64, MergeMethod)> {
        self.auto_merge_calls.lock().unwrap().clone()
    }

    /// Assert that a pull request was opened from `head` into `base`
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pull_request({head}, {base}) but got: {calls:?}"
        );
    }

    fn requested(&self, name: &str) -> Result<Vec<String>> {
        if self.rejected_reviewers.lock().unwrap().contains(name) {
            return Err(Error::GitHubApi(format!(
                "Reviews may only be requested from collaborators ({name})"
            )));
        }
        if self.ignored_reviewers.lock().unwrap().contains(name) {
            return Ok(Vec::new());
        }
        Ok(vec![name.to_string()])
    }
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::GitHubApi(msg.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn repo_default_branch(&self) -> Result<String> {
        self.default_branch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.default_branch.clone())
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool> {
        self.branch_exists_calls
            .lock()
            .unwrap()
            .push(branch.to_string());
        Ok(self.existing_branches.lock().unwrap().contains(branch))
    }

    async fn create_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestData> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        injected(&self.error_on_create_pr)?;

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequestData {
            url: format!("https://github.com/owner/repo/pull/{number}"),
            number,
        })
    }

    async fn request_reviewer(&self, pr_number: u64, reviewer: &str) -> Result<Vec<String>> {
        self.reviewer_calls
            .lock()
            .unwrap()
            .push((pr_number, reviewer.to_string()));
        self.requested(reviewer)
    }

    async fn request_team_reviewer(&self, pr_number: u64, team: &str) -> Result<Vec<String>> {
        self.team_reviewer_calls
            .lock()
            .unwrap()
            .push((pr_number, team.to_string()));
        self.requested(team)
    }

    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()> {
        self.add_labels_calls
            .lock()
            .unwrap()
            .push((pr_number, labels.to_vec()));
        injected(&self.error_on_add_labels)
    }

    async fn label_exists(&self, name: &str) -> Result<bool> {
        injected(&self.error_on_label_lookup)?;
        Ok(self.existing_labels.lock().unwrap().contains(name))
    }

    async fn create_label(&self, name: &str, color: &str, description: &str) -> Result<()> {
        self.create_label_calls.lock().unwrap().push(CreateLabelCall {
            name: name.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        });
        self.add_label(name);
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.comment_calls.lock().unwrap().push(CreateCommentCall {
            pr_number,
            body: body.to_string(),
        });
        injected(&self.error_on_comment)
    }

    async fn enable_auto_merge(&self, pr_number: u64, method: MergeMethod) -> Result<()> {
        self.auto_merge_calls
            .lock()
            .unwrap()
            .push((pr_number, method));
        injected(&self.error_on_auto_merge)
    }
}
