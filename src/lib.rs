//! gradlew-update - keep Gradle Wrappers current
//!
//! Finds every Gradle Wrapper in a repository, upgrades them to the latest
//! release, verifies the regenerated files and opens a single pull request.
//! A later, separate invocation reports reviewer assignment failures back
//! onto that pull request.

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod post;
pub mod pr;
pub mod release;
pub mod state;
pub mod types;
pub mod update;
pub mod wrapper;
