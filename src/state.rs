//! Cross-phase state
//!
//! The main and post phases run as separate processes. Everything the post
//! phase needs is written by the main phase into a string-keyed store and
//! read back through [`RunState`], which owns the key schema and the JSON
//! encoding of structured values.

use crate::error::{Error, Result};
use crate::types::PullRequestData;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Known state keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Set as the first action of the main phase
    MainPhaseExecuted,
    /// Pull request opened by the main phase
    PullRequestData,
    /// Reviewers whose assignment failed
    ErroredReviewers,
    /// Team reviewers whose assignment failed
    ErroredTeamReviewers,
}

impl StateKey {
    /// Key name in the underlying store
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainPhaseExecuted => "main-completed",
            Self::PullRequestData => "pull-request-data",
            Self::ErroredReviewers => "errored-reviewers",
            Self::ErroredTeamReviewers => "errored-team-reviewers",
        }
    }
}

/// String-keyed, string-valued store that outlives a single process
pub trait StateStore: Send + Sync {
    /// Store a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Read a value (`None` when never set)
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Typed access to the cross-phase state
pub struct RunState<'a> {
    store: &'a dyn StateStore,
}

impl<'a> RunState<'a> {
    /// Wrap a store
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self { store }
    }

    /// Record that the main phase has started
    pub fn set_main_phase_executed(&self) -> Result<()> {
        self.store.set(StateKey::MainPhaseExecuted.as_str(), "true")
    }

    /// Whether the main phase already ran in this job
    pub fn main_phase_executed(&self) -> Result<bool> {
        Ok(self
            .store
            .get(StateKey::MainPhaseExecuted.as_str())?
            .is_some_and(|v| v == "true"))
    }

    /// Record the created pull request
    pub fn set_pull_request(&self, data: &PullRequestData) -> Result<()> {
        self.set_json(StateKey::PullRequestData, data)
    }

    /// Pull request created by the main phase, if any
    pub fn pull_request(&self) -> Result<Option<PullRequestData>> {
        self.get_json(StateKey::PullRequestData)
    }

    /// Record reviewers whose assignment failed
    pub fn set_errored_reviewers(&self, reviewers: &[String]) -> Result<()> {
        self.set_json(StateKey::ErroredReviewers, reviewers)
    }

    /// Reviewers whose assignment failed (empty when none recorded)
    pub fn errored_reviewers(&self) -> Result<Vec<String>> {
        Ok(self.get_json(StateKey::ErroredReviewers)?.unwrap_or_default())
    }

    /// Record team reviewers whose assignment failed
    pub fn set_errored_team_reviewers(&self, teams: &[String]) -> Result<()> {
        self.set_json(StateKey::ErroredTeamReviewers, teams)
    }

    /// Team reviewers whose assignment failed (empty when none recorded)
    pub fn errored_team_reviewers(&self) -> Result<Vec<String>> {
        Ok(self
            .get_json(StateKey::ErroredTeamReviewers)?
            .unwrap_or_default())
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: StateKey, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        debug!("Saving state {}={encoded}", key.as_str());
        self.store.set(key.as_str(), &encoded)
    }

    fn get_json<T: DeserializeOwned>(&self, key: StateKey) -> Result<Option<T>> {
        match self.store.get(key.as_str())? {
            Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::State(format!("invalid value for {}: {e}", key.as_str()))),
            _ => Ok(None),
        }
    }
}

/// GitHub Actions state: written to `$GITHUB_STATE`, read back from `STATE_*`
///
/// The runner turns lines appended to the state file by the main step into
/// `STATE_<key>` environment variables of the post step.
pub struct ActionsStateStore {
    state_file: Option<PathBuf>,
    saved: HashMap<String, String>,
}

impl ActionsStateStore {
    /// Build from the current process environment
    pub fn from_env() -> Self {
        let saved = std::env::vars()
            .filter_map(|(k, v)| k.strip_prefix("STATE_").map(|k| (k.to_string(), v)))
            .collect();

        Self::new(std::env::var_os("GITHUB_STATE").map(PathBuf::from), saved)
    }

    /// Build from an explicit state file and previously saved values
    pub const fn new(state_file: Option<PathBuf>, saved: HashMap<String, String>) -> Self {
        Self { state_file, saved }
    }
}

impl StateStore for ActionsStateStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self
            .state_file
            .as_ref()
            .ok_or_else(|| Error::State("GITHUB_STATE is not set".to_string()))?;

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        if key.contains(&delimiter) || value.contains(&delimiter) {
            return Err(Error::State(format!("unexpected delimiter in state {key}")));
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{key}<<{delimiter}\n{value}\n{delimiter}")?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.saved.get(key).cloned())
    }
}

/// State kept in a JSON object file, for runs outside GitHub Actions
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Use (and create on first write) the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Map<String, Value>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl StateStore for FileStateStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        std::fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .load()?
            .get(key)
            .and_then(Value::as_str)
            .map(ToString::to_string))
    }
}

/// In-process store (dry runs and tests)
#[derive(Default)]
pub struct MemoryStateStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| Error::State("state lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .map_err(|_| Error::State("state lock poisoned".to_string()))?
            .get(key)
            .cloned())
    }
}
