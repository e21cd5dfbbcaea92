//! Mock git, wrapper runner and release resolver

#![allow(dead_code)]

use async_trait::async_trait;
use gradlew_update::error::{Error, Result};
use gradlew_update::git::Git;
use gradlew_update::release::{ReleaseChannel, ReleaseResolver};
use gradlew_update::types::{DistributionType, Release};
use gradlew_update::wrapper::WrapperUpdateRunner;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A recorded git invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Fetch,
    Checkout(String),
    CheckoutCreateBranch(String, String),
    Add(Vec<String>),
    Commit(String),
    Push(String),
    DiffNamesOnly,
    ParseHead,
    Config(String, String),
    UnsetConfig(String),
    RemoteUrl(String),
}

/// Hand-written mock of [`Git`]
///
/// `diff_names_only` answers from a queue of scripted responses and returns
/// an empty list once the queue is drained.
pub struct MockGit {
    head: String,
    diffs: Mutex<VecDeque<Vec<String>>>,
    calls: Mutex<Vec<GitCall>>,
    error_on_checkout: Mutex<Option<String>>,
    error_on_push: Mutex<Option<String>>,
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGit {
    pub fn new() -> Self {
        Self {
            head: "0123456789abcdef0123456789abcdef01234567".to_string(),
            diffs: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            error_on_checkout: Mutex::new(None),
            error_on_push: Mutex::new(None),
        }
    }

    /// Queue the result of the next `diff_names_only` call
    pub fn push_diff(&self, files: &[&str]) {
        self.diffs
            .lock()
            .unwrap()
            .push_back(files.iter().map(ToString::to_string).collect());
    }

    /// Queue the two diffs of an updated wrapper (after each update pass)
    pub fn push_updated_wrapper(&self, files: &[&str]) {
        self.push_diff(files);
        self.push_diff(files);
    }

    pub fn fail_checkout(&self, stderr: &str) {
        *self.error_on_checkout.lock().unwrap() = Some(stderr.to_string());
    }

    pub fn fail_push(&self, stderr: &str) {
        *self.error_on_push.lock().unwrap() = Some(stderr.to_string());
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn get_calls(&self) -> Vec<GitCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_commits(&self) -> Vec<String> {
        self.get_calls()
            .into_iter()
            .filter_map(|c| match c {
                GitCall::Commit(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn get_pushes(&self) -> Vec<String> {
        self.get_calls()
            .into_iter()
            .filter_map(|c| match c {
                GitCall::Push(branch) => Some(branch),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn git_error(command: &str, slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(stderr) => Err(Error::Git {
            command: command.to_string(),
            stderr: stderr.clone(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl Git for MockGit {
    async fn fetch(&self) -> Result<()> {
        self.record(GitCall::Fetch);
        Ok(())
    }

    async fn checkout(&self, branch: &str) -> Result<()> {
        self.record(GitCall::Checkout(branch.to_string()));
        git_error("checkout", &self.error_on_checkout)
    }

    async fn checkout_create_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        self.record(GitCall::CheckoutCreateBranch(
            branch.to_string(),
            start_point.to_string(),
        ));
        Ok(())
    }

    async fn add(&self, paths: &[String]) -> Result<()> {
        self.record(GitCall::Add(paths.to_vec()));
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<()> {
        self.record(GitCall::Commit(message.to_string()));
        Ok(())
    }

    async fn push(&self, branch: &str) -> Result<()> {
        self.record(GitCall::Push(branch.to_string()));
        git_error("push", &self.error_on_push)
    }

    async fn diff_names_only(&self) -> Result<Vec<String>> {
        self.record(GitCall::DiffNamesOnly);
        Ok(self.diffs.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn parse_head(&self) -> Result<String> {
        self.record(GitCall::ParseHead);
        Ok(self.head.clone())
    }

    async fn config(&self, key: &str, value: &str) -> Result<()> {
        self.record(GitCall::Config(key.to_string(), value.to_string()));
        Ok(())
    }

    async fn unset_config(&self, key: &str) -> Result<()> {
        self.record(GitCall::UnsetConfig(key.to_string()));
        Ok(())
    }

    async fn remote_url(&self, remote: &str) -> Result<String> {
        self.record(GitCall::RemoteUrl(remote.to_string()));
        Ok("https://github.com/owner/repo.git".to_string())
    }
}

/// Call record for `WrapperUpdateRunner::update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub base_dir: PathBuf,
    pub target_version: String,
    pub distribution_type: DistributionType,
    pub checksum: Option<String>,
    pub distribution_url: Option<String>,
}

/// Hand-written mock of [`WrapperUpdateRunner`]
#[derive(Default)]
pub struct MockRunner {
    update_calls: Mutex<Vec<UpdateCall>>,
    verify_calls: Mutex<Vec<(PathBuf, String)>>,
    error_on_verify: Mutex<Option<String>>,
    error_on_update: Mutex<Option<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_verify(&self, msg: &str) {
        *self.error_on_verify.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_update(&self, msg: &str) {
        *self.error_on_update.lock().unwrap() = Some(msg.to_string());
    }

    pub fn get_update_calls(&self) -> Vec<UpdateCall> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn get_verify_calls(&self) -> Vec<(PathBuf, String)> {
        self.verify_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WrapperUpdateRunner for MockRunner {
    async fn update(
        &self,
        base_dir: &Path,
        target_version: &str,
        distribution_type: DistributionType,
        checksum: Option<&str>,
        distribution_url: Option<&str>,
    ) -> Result<()> {
        self.update_calls.lock().unwrap().push(UpdateCall {
            base_dir: base_dir.to_path_buf(),
            target_version: target_version.to_string(),
            distribution_type,
            checksum: checksum.map(ToString::to_string),
            distribution_url: distribution_url.map(ToString::to_string),
        });

        match self.error_on_update.lock().unwrap().as_ref() {
            Some(msg) => Err(Error::Update(msg.clone())),
            None => Ok(()),
        }
    }

    async fn verify(&self, base_dir: &Path, expected_jar_checksum: &str) -> Result<()> {
        self.verify_calls
            .lock()
            .unwrap()
            .push((base_dir.to_path_buf(), expected_jar_checksum.to_string()));

        match self.error_on_verify.lock().unwrap().as_ref() {
            Some(msg) => Err(Error::Verification(msg.clone())),
            None => Ok(()),
        }
    }
}

/// Hand-written mock of [`ReleaseResolver`]
pub struct MockReleases {
    release: Release,
    calls: Mutex<Vec<ReleaseChannel>>,
    error: Mutex<Option<String>>,
}

impl MockReleases {
    pub fn new(release: Release) -> Self {
        Self {
            release,
            calls: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    pub fn fail(&self, msg: &str) {
        *self.error.lock().unwrap() = Some(msg.to_string());
    }

    pub fn get_calls(&self) -> Vec<ReleaseChannel> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseResolver for MockReleases {
    async fn fetch(&self, channel: ReleaseChannel) -> Result<Release> {
        self.calls.lock().unwrap().push(channel);
        match self.error.lock().unwrap().as_ref() {
            Some(msg) => Err(Error::ReleaseFetch(msg.clone())),
            None => Ok(self.release.clone()),
        }
    }
}
