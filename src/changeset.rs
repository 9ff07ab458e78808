//! Change-set classification: which pattern groups a PR's files touch.

use crate::error::GovernanceError;
use crate::policy::PolicyPack;
use crate::ports::git::GitRepo;

/// How a file changed between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// File is new in the head revision.
    Added,
    /// File exists in both revisions with different content.
    Modified,
    /// File was removed in the head revision.
    Deleted,
    /// File moved; the recorded path is the new one.
    Renamed,
}

/// A single changed file from a `base...head` diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative path (the new path for renames).
    pub path: String,
    /// Kind of change.
    pub change_type: ChangeType,
}

/// Pattern-group labels a changed file can carry.
///
/// A file may match several groups at once (an `sdk/openapi.yaml` spec
/// is both `interface` and `openapi`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Public interface surface.
    Interface,
    /// Documentation file.
    Doc,
    /// OpenAPI/Swagger spec.
    Openapi,
    /// SDK/client code.
    Sdk,
    /// Reference documentation.
    ReferenceDoc,
}

/// A changed file together with the labels it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileClassification {
    /// The changed file.
    pub file: ChangedFile,
    /// Pattern groups the path matched, in declaration order.
    pub labels: Vec<Label>,
}

impl FileClassification {
    /// Returns `true` if the file carries the given label.
    #[must_use]
    pub fn has(&self, label: Label) -> bool {
        self.labels.contains(&label)
    }
}

/// Obtains the changed files between two refs through the git port.
///
/// # Errors
///
/// Returns a `Diff` error when either ref cannot be resolved.
pub fn changed_files(
    git: &dyn GitRepo,
    base: &str,
    head: &str,
) -> Result<Vec<ChangedFile>, GovernanceError> {
    let raw = git
        .diff_name_status(base, head)
        .map_err(|e| GovernanceError::Diff(format!("{base}...{head}: {e}")))?;
    Ok(parse_name_status(&raw))
}

/// Parses `git diff --name-status` output into changed files.
///
/// Rename and copy lines carry two paths; the new path is kept. Lines
/// with an unrecognized status letter are treated as modifications so
/// an unusual diff never drops a file from classification.
#[must_use]
pub fn parse_name_status(raw: &str) -> Vec<ChangedFile> {
    raw.lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let status = fields.next()?.trim();
            if status.is_empty() {
                return None;
            }
            let first_path = fields.next()?.trim();
            let second_path = fields.next().map(str::trim);
            let (change_type, path) = match status.chars().next()? {
                'A' => (ChangeType::Added, first_path),
                'D' => (ChangeType::Deleted, first_path),
                'R' => (ChangeType::Renamed, second_path.unwrap_or(first_path)),
                'C' => (ChangeType::Added, second_path.unwrap_or(first_path)),
                _ => (ChangeType::Modified, first_path),
            };
            if path.is_empty() {
                return None;
            }
            Some(ChangedFile { path: path.to_string(), change_type })
        })
        .collect()
}

/// Classifies each changed file against the pack's pattern groups.
///
/// Deterministic: the output order follows the input order, and labels
/// are evaluated in a fixed group order.
#[must_use]
pub fn classify(files: Vec<ChangedFile>, pack: &PolicyPack) -> Vec<FileClassification> {
    files
        .into_iter()
        .map(|file| {
            let groups: [(Label, bool); 5] = [
                (Label::Interface, pack.interface_patterns.matches(&file.path)),
                (Label::Doc, pack.doc_patterns.matches(&file.path)),
                (Label::Openapi, pack.openapi_patterns.matches(&file.path)),
                (Label::Sdk, pack.sdk_patterns.matches(&file.path)),
                (Label::ReferenceDoc, pack.reference_doc_patterns.matches(&file.path)),
            ];
            let labels =
                groups.into_iter().filter_map(|(label, hit)| hit.then_some(label)).collect();
            FileClassification { file, labels }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::ScriptedGit;
    use crate::policy::sample_pack;

    fn changed(path: &str) -> ChangedFile {
        ChangedFile { path: path.to_string(), change_type: ChangeType::Modified }
    }

    #[test]
    fn parses_simple_statuses() {
        let raw = "A\tapi/orders.rs\nM\tdocs/guide.md\nD\tsdk/old.rs\n";
        let files = parse_name_status(raw);
        assert_eq!(
            files,
            vec![
                ChangedFile { path: "api/orders.rs".into(), change_type: ChangeType::Added },
                ChangedFile { path: "docs/guide.md".into(), change_type: ChangeType::Modified },
                ChangedFile { path: "sdk/old.rs".into(), change_type: ChangeType::Deleted },
            ]
        );
    }

    #[test]
    fn rename_keeps_new_path() {
        let raw = "R087\tdocs/old.md\tdocs/new.md\n";
        let files = parse_name_status(raw);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "docs/new.md");
        assert_eq!(files[0].change_type, ChangeType::Renamed);
    }

    #[test]
    fn blank_and_malformed_lines_are_skipped() {
        let raw = "\nM\tdocs/a.md\n\nnot-a-diff-line\n";
        let files = parse_name_status(raw);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "docs/a.md");
    }

    #[test]
    fn classify_assigns_multiple_labels() {
        let pack = sample_pack();
        let classified = classify(vec![changed("sdk/client.rs")], &pack);
        assert!(classified[0].has(Label::Interface));
        assert!(classified[0].has(Label::Sdk));
        assert!(!classified[0].has(Label::Doc));
    }

    #[test]
    fn classify_assigns_no_labels_outside_all_groups() {
        let pack = sample_pack();
        let classified = classify(vec![changed("src/internal/util.rs")], &pack);
        assert!(classified[0].labels.is_empty());
    }

    #[test]
    fn reference_doc_is_also_doc() {
        let pack = sample_pack();
        let classified = classify(vec![changed("docs/reference/orders.md")], &pack);
        assert!(classified[0].has(Label::Doc));
        assert!(classified[0].has(Label::ReferenceDoc));
    }

    #[test]
    fn classify_is_deterministic() {
        let pack = sample_pack();
        let files = vec![changed("api/a.rs"), changed("docs/b.md"), changed("sdk/c.rs")];
        let first = classify(files.clone(), &pack);
        let second = classify(files, &pack);
        assert_eq!(first, second);
    }

    #[test]
    fn changed_files_maps_git_failure_to_diff_error() {
        let git = ScriptedGit {
            diff_output: Err("unknown revision `nope`".to_string()),
            tracked_files: vec![],
        };
        let err = changed_files(&git, "main", "nope").unwrap_err();
        assert!(matches!(err, GovernanceError::Diff(_)));
        assert!(err.to_string().contains("main...nope"));
    }

    #[test]
    fn changed_files_parses_port_output() {
        let git = ScriptedGit {
            diff_output: Ok("M\tapi/openapi.yaml\n".to_string()),
            tracked_files: vec![],
        };
        let files = changed_files(&git, "main", "feature").unwrap();
        assert_eq!(files[0].path, "api/openapi.yaml");
    }
}
