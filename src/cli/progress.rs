//! CLI progress callback with styled output
//!
//! Under GitHub Actions each wrapper is wrapped in a collapsible log group
//! and fatal errors become `::error::` annotations.

use crate::cli::style::{Stylize, bullet, check, cross};
use anstream::{eprintln, println};
use async_trait::async_trait;
use gradlew_update::error::Error;
use gradlew_update::types::PullRequestData;
use gradlew_update::update::{ProgressCallback, Step, WrapperStatus};
use gradlew_update::wrapper::WrapperDescriptor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// CLI progress callback printing to stdout
pub struct CliProgress {
    actions: bool,
    group_open: AtomicBool,
}

impl CliProgress {
    /// Plain terminal output
    pub const fn terminal() -> Self {
        Self {
            actions: false,
            group_open: AtomicBool::new(false),
        }
    }

    /// GitHub Actions workflow commands
    pub const fn actions() -> Self {
        Self {
            actions: true,
            group_open: AtomicBool::new(false),
        }
    }

    fn end_group(&self) {
        if self.group_open.swap(false, Ordering::SeqCst) {
            println!("::endgroup::");
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_step(&self, step: Step) {
        match step {
            Step::Complete => {}
            _ => println!("{}...", step.to_string().emphasis()),
        }
    }

    async fn on_wrapper_start(&self, wrapper: &WrapperDescriptor) {
        let path = wrapper.path().display();
        if self.actions {
            self.end_group();
            println!("::group::Working with Wrapper at: {path}");
            self.group_open.store(true, Ordering::SeqCst);
        }
        println!(
            "  {} {} ({} {})",
            bullet(),
            path,
            wrapper.version().accent(),
            wrapper.distribution_type().muted()
        );
    }

    async fn on_wrapper_done(&self, path: &Path, status: &WrapperStatus) {
        match status {
            WrapperStatus::Committed { .. } => {
                println!(
                    "  {} {}: {}",
                    check(),
                    path.display(),
                    status.to_string().success()
                );
            }
            WrapperStatus::UpToDate | WrapperStatus::Unchanged => {
                println!("  {} {}", "-".muted(), status.to_string().muted());
            }
        }
        self.end_group();
    }

    async fn on_pr_created(&self, pr: &PullRequestData) {
        println!(
            "{} Created a Pull Request {} at {}",
            check(),
            format!("#{}", pr.number).accent(),
            pr.url.accent()
        );
    }

    async fn on_error(&self, err: &Error) {
        self.end_group();
        if self.actions {
            // Annotations are single-line
            println!("::error::{}", err.to_string().replace('\n', "%0A"));
        } else {
            eprintln!("{} {}: {}", cross(), "error".error(), err);
        }
    }

    async fn on_message(&self, message: &str) {
        println!("  {}", message.muted());
    }
}
