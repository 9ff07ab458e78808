//! Service context bundling all port trait objects.

use std::path::PathBuf;

use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::GitRepo;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Commands
/// receive a context instead of constructing adapters themselves so
/// that tests can substitute fixed clocks, in-memory filesystems, and
/// scripted git output.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Filesystem for reading inputs and writing report artifacts.
    pub fs: Box<dyn FileSystem>,
    /// Git repository for version-control queries.
    pub git: Box<dyn GitRepo>,
}

impl ServiceContext {
    /// Creates a live context with real adapters, operating on the
    /// current working directory's repository.
    #[must_use]
    pub fn live() -> Self {
        use crate::adapters::live::clock::LiveClock;
        use crate::adapters::live::filesystem::LiveFileSystem;
        use crate::adapters::live::git::LiveGitRepo;

        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            git: Box::new(LiveGitRepo::new(PathBuf::from("."))),
        }
    }
}
