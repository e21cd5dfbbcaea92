//! Post phase command

use crate::cli::GlobalArgs;
use gradlew_update::auth::{self, get_github_auth};
use gradlew_update::error::Result;
use gradlew_update::git::GitCli;
use gradlew_update::post::PostPhase;
use gradlew_update::state::{RunState, StateStore};
use tracing::{debug, info};

/// Run the post phase; never fails
pub async fn run_post(args: &GlobalArgs, repo_token: Option<&str>, state: &dyn StateStore) {
    if let Err(e) = try_run_post(args, repo_token, state).await {
        debug!("Post action task failed");
        debug!("error: {e}");
    }
}

async fn try_run_post(args: &GlobalArgs, repo_token: Option<&str>, state: &dyn StateStore) -> Result<()> {
    let git = GitCli::new(&args.workspace);

    // Runs before any lookup that can fail
    if let Err(e) = auth::cleanup(&git, &args.server_url).await {
        debug!("Unable to clean up git credentials: {e}");
    }

    let Some(pr) = RunState::new(state).pull_request()? else {
        info!("No pull request was created by the main phase");
        return Ok(());
    };

    let token = get_github_auth(repo_token).await?;
    let github = args.github(&token.token, &git).await?;

    PostPhase::new(&github, state).run(&pr).await;

    Ok(())
}
