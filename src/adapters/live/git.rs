//! Live git adapter using `git` CLI commands.

use std::path::PathBuf;
use std::process::Command;

use crate::ports::git::GitRepo;

/// Live git adapter that shells out to the `git` CLI.
///
/// All commands run in the configured repository directory.
pub struct LiveGitRepo {
    repo_dir: PathBuf,
}

impl LiveGitRepo {
    /// Creates an adapter operating on the repository at `repo_dir`.
    #[must_use]
    pub fn new(repo_dir: PathBuf) -> Self {
        Self { repo_dir }
    }
}

impl GitRepo for LiveGitRepo {
    fn diff_name_status(
        &self,
        base: &str,
        head: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let range = format!("{base}...{head}");
        let output = Command::new("git")
            .current_dir(&self.repo_dir)
            .args(["diff", "--name-status", &range])
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git diff --name-status {range} failed: {stderr}").into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list_files(
        &self,
        pathspec: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("git")
            .current_dir(&self.repo_dir)
            .args(["ls-files", "--", pathspec])
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git ls-files -- {pathspec} failed: {stderr}").into());
        }
        let files = String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect();
        Ok(files)
    }
}
