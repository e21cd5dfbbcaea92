//! CLI commands
//!
//! Command implementations for the `gradlew-update` binary.

mod logging;
mod post;
mod progress;
mod style;
mod update;

pub use logging::init_tracing;
pub use post::run_post;
pub use update::run_main;

use clap::Args;
use gradlew_update::auth::DEFAULT_SERVER_URL;
use gradlew_update::error::Result;
use gradlew_update::git::Git;
use gradlew_update::platform::{GitHubService, detect_repository};
use gradlew_update::release::GRADLE_SERVICES_URL;
use gradlew_update::state::{ActionsStateStore, FileStateStore, RunState, StateStore};
use std::path::PathBuf;
use tracing::debug;

/// Options shared by every command
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Repository checkout to update
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".", global = true)]
    pub workspace: PathBuf,

    /// Target repository as owner/repo (defaults to the origin remote)
    #[arg(long, env = "GITHUB_REPOSITORY", global = true)]
    pub repository: Option<String>,

    /// GitHub REST API URL
    #[arg(long, env = "GITHUB_API_URL", global = true)]
    pub api_url: Option<String>,

    /// GitHub server URL, used to scope git credentials
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER_URL, global = true)]
    pub server_url: String,

    /// Keep cross-phase state in this JSON file instead of GitHub Actions state
    #[arg(long, global = true)]
    pub state_file: Option<PathBuf>,

    /// Gradle executable used to regenerate wrappers
    #[arg(long, default_value = "gradle", global = true)]
    pub gradle: PathBuf,

    /// Gradle services URL (release metadata)
    #[arg(long, default_value = GRADLE_SERVICES_URL, global = true, hide = true)]
    pub services_url: String,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Whether we are running inside a GitHub Actions job
    pub fn in_actions() -> bool {
        std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
    }

    /// Cross-phase state store selected by the arguments
    pub fn state_store(&self) -> Box<dyn StateStore> {
        match &self.state_file {
            Some(path) => Box::new(FileStateStore::new(path)),
            None => Box::new(ActionsStateStore::from_env()),
        }
    }

    /// Connect to the repository on GitHub
    pub async fn github(&self, token: &str, git: &dyn Git) -> Result<GitHubService> {
        let remote = match &self.repository {
            Some(_) => None,
            None => git.remote_url("origin").await.ok(),
        };
        let repo = detect_repository(self.repository.as_deref(), remote.as_deref())?;
        debug!("Repository: {}/{}", repo.owner, repo.repo);

        GitHubService::new(token, repo, self.api_url.as_deref())
    }
}

/// Pick the phase from the persisted main-phase flag
pub async fn run_dispatch(args: &GlobalArgs, raw: gradlew_update::config::RawInputs) -> anyhow::Result<()> {
    let state = args.state_store();

    if RunState::new(state.as_ref()).main_phase_executed()? {
        run_post(args, raw.repo_token.as_deref(), state.as_ref()).await;
        Ok(())
    } else {
        run_main(args, raw, state.as_ref()).await
    }
}
