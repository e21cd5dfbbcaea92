//! Wrapper update workflow (main phase)
//!
//! Resolves the target release, updates every discovered wrapper on a
//! fresh branch and opens a single pull request for the result.

mod orchestrator;
mod progress;

pub use orchestrator::{
    AggregateOutcome, BRANCH_PREFIX, COMMITTER_EMAIL, COMMITTER_NAME, Outcome, Services,
    UpdateOrchestrator, branch_name,
};
pub use progress::{NoopProgress, ProgressCallback, Step, WrapperStatus};
