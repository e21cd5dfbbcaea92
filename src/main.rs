//! gradlew-update - keep Gradle Wrappers current
//!
//! CLI binary running the main (update) and post (report) phases.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gradlew_update::config::RawInputs;
use tracing::Level;

mod cli;

#[derive(Parser)]
#[command(name = "gradlew-update")]
#[command(about = "Update Gradle Wrappers and open a pull request")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: cli::GlobalArgs,

    #[command(flatten)]
    inputs: RawInputs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the main phase, or the post phase if the main phase already ran (default)
    Run,

    /// Update wrappers and open a pull request
    Main,

    /// Report reviewers that could not be assigned
    Post,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(if cli.global.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    });

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cli::run_dispatch(&cli.global, cli.inputs).await?,
        Commands::Main => {
            let state = cli.global.state_store();
            cli::run_main(&cli.global, cli.inputs, state.as_ref()).await?;
        }
        Commands::Post => {
            let state = cli.global.state_store();
            cli::run_post(&cli.global, cli.inputs.repo_token.as_deref(), state.as_ref()).await;
        }
    }

    Ok(())
}
