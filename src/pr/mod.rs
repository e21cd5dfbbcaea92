//! Pull request text and collaborator assignment

mod compose;
mod notify;

pub use compose::{
    PullRequestText, SOURCE_VERSION_PLACEHOLDER, TARGET_VERSION_PLACEHOLDER,
    UNKNOWN_SOURCE_VERSION, compose, replace_version_placeholders,
};
pub use notify::{
    AssignmentFailure, AssignmentReport, CollaboratorNotifier, DEFAULT_LABEL, DEFAULT_LABEL_COLOR,
    DEFAULT_LABEL_DESCRIPTION,
};
