//! Gradle Wrapper discovery, parsing and regeneration

mod descriptor;
mod locate;
mod updater;

pub use descriptor::{WrapperDescriptor, distribution_url};
pub use locate::{WRAPPER_PROPERTIES, WrapperLocator};
pub use updater::{GradleRunner, WrapperUpdateRunner, sha256_file};
