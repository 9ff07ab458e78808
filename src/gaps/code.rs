//! Code-change gap collector: interface surface without matching docs.

use chrono::{DateTime, Utc};

use crate::changeset::{ChangeType, FileClassification, Label};

use super::{CollectFuture, DocType, Gap, GapCollector, GapSource};

/// Proposes one gap per changed interface file that has no doc change
/// with a matching file stem in the same change set.
///
/// Stem matching (e.g. `api/orders.rs` against `docs/orders.md`) is
/// finer-grained than the contract gate on purpose: the gate answers
/// "may this PR merge", this collector answers "which surfaces still
/// need writing".
pub struct CodeChangeCollector {
    classifications: Vec<FileClassification>,
    now: DateTime<Utc>,
}

impl CodeChangeCollector {
    /// Creates a collector over an already-classified change set.
    #[must_use]
    pub fn new(classifications: Vec<FileClassification>, now: DateTime<Utc>) -> Self {
        Self { classifications, now }
    }

    fn propose(&self) -> Vec<Gap> {
        let doc_stems: Vec<String> = self
            .classifications
            .iter()
            .filter(|c| c.has(Label::Doc))
            .filter_map(|c| stem(&c.file.path))
            .collect();

        self.classifications
            .iter()
            .filter(|c| c.has(Label::Interface))
            .filter(|c| {
                stem(&c.file.path).is_none_or(|s| !doc_stems.contains(&s))
            })
            .map(|c| {
                let path = &c.file.path;
                let (verb, doc_type) = match c.file.change_type {
                    ChangeType::Added => ("added", DocType::Reference),
                    ChangeType::Modified => ("modified", DocType::Reference),
                    ChangeType::Renamed => ("renamed", DocType::HowTo),
                    ChangeType::Deleted => ("removed", DocType::HowTo),
                };
                Gap::new(
                    GapSource::CodeChange,
                    format!("Undocumented interface change: {path}"),
                    format!(
                        "Interface surface {verb} in `{path}` with no doc change sharing its \
                         name in this change set."
                    ),
                    doc_type,
                    1,
                    self.now,
                )
            })
            .collect()
    }
}

impl GapCollector for CodeChangeCollector {
    fn name(&self) -> &'static str {
        "code"
    }

    fn collect(&self) -> CollectFuture<'_> {
        let gaps = self.propose();
        Box::pin(async move { Ok(gaps) })
    }
}

/// Lowercase file stem used to pair interface files with docs.
fn stem(path: &str) -> Option<String> {
    std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
}
