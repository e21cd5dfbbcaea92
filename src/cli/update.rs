//! Main phase command

use crate::cli::GlobalArgs;
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, check};
use anstream::{eprintln, println};
use gradlew_update::auth::{GitAuth, get_github_auth};
use gradlew_update::config::{Inputs, RawInputs};
use gradlew_update::git::GitCli;
use gradlew_update::release::GradleReleases;
use gradlew_update::state::{RunState, StateStore};
use gradlew_update::update::{Outcome, Services, UpdateOrchestrator};
use gradlew_update::wrapper::{GradleRunner, WrapperLocator};

/// Run the main phase
pub async fn run_main(args: &GlobalArgs, raw: RawInputs, state: &dyn StateStore) -> anyhow::Result<()> {
    // Before validating inputs, so a bad configuration is not retried by the dispatcher
    RunState::new(state).set_main_phase_executed()?;

    let token = get_github_auth(raw.repo_token.as_deref()).await?;
    let inputs = Inputs::try_from(raw)?;

    let actions = GlobalArgs::in_actions();
    let git = GitCli::new(&args.workspace);
    let github = args.github(&token.token, &git).await?;
    let releases = GradleReleases::new(&args.services_url)?;
    let runner = GradleRunner::with_program(&args.gradle);
    let locator = WrapperLocator::new(&args.workspace)?;

    let services = Services {
        releases: &releases,
        github: &github,
        git: &git,
        runner: &runner,
        state,
    };

    let progress = if actions {
        CliProgress::actions()
    } else {
        CliProgress::terminal()
    };

    let outcome = UpdateOrchestrator::new(services, &inputs, &locator)
        .with_git_auth(GitAuth::new(&args.server_url, token.token).masked(actions))
        .run(&progress)
        .await?;

    match outcome {
        Outcome::BranchExists { branch } => {
            println!(
                "Branch {} already exists, a pull request for this release was already opened",
                branch.accent()
            );
        }
        Outcome::NoWrappers => {
            eprintln!("{}", "No Gradle Wrapper found in this project".warn());
        }
        Outcome::UpToDate { version } => {
            println!(
                "{} Gradle Wrapper is already up-to-date (version {})",
                check(),
                version.accent()
            );
        }
        Outcome::PullRequestCreated(_) => {}
    }

    Ok(())
}
