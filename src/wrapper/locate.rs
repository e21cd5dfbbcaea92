//! Wrapper discovery with include/ignore globs

use crate::error::Result;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Relative location of the properties file inside a Gradle project
pub const WRAPPER_PROPERTIES: &str = "gradle/wrapper/gradle-wrapper.properties";

/// Finds `gradle-wrapper.properties` files below a root directory
pub struct WrapperLocator {
    root: PathBuf,
}

impl WrapperLocator {
    /// Search below `root` (made absolute against the current directory)
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self { root })
    }

    /// Root directory searched
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate wrapper files, filtered by include then ignore globs
    ///
    /// A file is kept by an include glob (or dropped by an ignore glob) only
    /// when the glob matches its whole absolute path. Relative globs are
    /// anchored at the search root. Symlinks are not followed.
    pub fn locate(&self, paths_include: &[String], paths_ignore: &[String]) -> Result<Vec<PathBuf>> {
        let found = self.discover()?;
        debug!("wrapper.properties found: {found:?}");

        let include = self.glob_set(paths_include)?;
        let ignore = self.glob_set(paths_ignore)?;

        Ok(filter_paths(found, include.as_ref(), ignore.as_ref()))
    }

    fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry?;
            if is_file_or_file_link(&entry) && entry.path().ends_with(WRAPPER_PROPERTIES) {
                found.push(entry.into_path());
            }
        }

        Ok(found)
    }

    fn glob_set(&self, patterns: &[String]) -> Result<Option<GlobSet>> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(self.glob(pattern)?);
        }
        Ok(Some(builder.build()?))
    }

    fn glob(&self, pattern: &str) -> Result<Glob> {
        let anchored = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            let relative = pattern.trim_start_matches("./");
            format!("{}/{relative}", globset::escape(&self.root.to_string_lossy()))
        };

        Ok(GlobBuilder::new(&anchored).literal_separator(true).build()?)
    }
}

/// Regular files, and symlinks pointing at one; symlinked directories are not entered
fn is_file_or_file_link(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Include filtering strictly before ignore filtering
fn filter_paths(
    paths: Vec<PathBuf>,
    include: Option<&GlobSet>,
    ignore: Option<&GlobSet>,
) -> Vec<PathBuf> {
    let included: Vec<PathBuf> = match include {
        Some(set) => paths.into_iter().filter(|p| set.is_match(p)).collect(),
        None => paths,
    };
    debug!("wrapper.properties after paths include: {included:?}");

    let kept: Vec<PathBuf> = match ignore {
        Some(set) => included.into_iter().filter(|p| !set.is_match(p)).collect(),
        None => included,
    };
    debug!("wrapper.properties after paths ignore: {kept:?}");

    kept
}
