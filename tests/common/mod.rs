//! Shared test utilities

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_git;
pub mod mock_platform;

pub use fixtures::*;
pub use mock_git::*;
pub use mock_platform::*;
