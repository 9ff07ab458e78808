//! Git repository port for version-control queries.

/// Provides read access to a git repository.
///
/// This is the only out-of-scope dependency of the change-set
/// classifier: the port returns raw git output and the core parses it,
/// so classification stays a pure function testable without a
/// repository.
pub trait GitRepo: Send + Sync {
    /// Returns the `git diff --name-status` output between two refs
    /// (three-dot range, matching PR semantics).
    ///
    /// # Errors
    ///
    /// Returns an error if either ref cannot be resolved or the diff
    /// cannot be computed.
    fn diff_name_status(
        &self,
        base: &str,
        head: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Lists tracked files matching a pathspec (e.g. `docs/**/*.md`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file list cannot be retrieved.
    fn list_files(
        &self,
        pathspec: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>>;
}
