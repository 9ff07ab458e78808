//! Staleness gap collector: docs past their review window.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::error::CollectionFailure;
use crate::frontmatter;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::GitRepo;

use super::{CollectFuture, DocType, Gap, GapCollector, GapSource};

/// Proposes one gap per tracked markdown doc whose `last_reviewed`
/// frontmatter date is older than the staleness window.
///
/// Docs without frontmatter or without a parsable `last_reviewed` are
/// skipped here; frontmatter coverage is a KPI concern, not a
/// staleness one.
pub struct StalenessCollector<'a> {
    fs: &'a dyn FileSystem,
    git: &'a dyn GitRepo,
    docs_dir: String,
    stale_days: i64,
    now: DateTime<Utc>,
}

impl<'a> StalenessCollector<'a> {
    /// Creates a collector over the tracked docs under `docs_dir`.
    #[must_use]
    pub fn new(
        fs: &'a dyn FileSystem,
        git: &'a dyn GitRepo,
        docs_dir: String,
        stale_days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self { fs, git, docs_dir, stale_days, now }
    }

    fn propose(&self) -> Result<Vec<Gap>, CollectionFailure> {
        let pathspec = format!("{}/*.md", self.docs_dir.trim_end_matches('/'));
        let files = self.git.list_files(&pathspec).map_err(|e| CollectionFailure {
            collector: "staleness",
            cause: format!("cannot list docs under {}: {e}", self.docs_dir),
        })?;

        let cutoff = self.now.date_naive() - Duration::days(self.stale_days);
        let mut gaps = Vec::new();
        for path in files.iter().filter(|p| !p.contains("assets/")) {
            let Ok(text) = self.fs.read_to_string(Path::new(path)) else {
                continue;
            };
            let Some(fm) = frontmatter::parse(&text) else {
                continue;
            };
            let Some(reviewed) = frontmatter::date_field(&fm, "last_reviewed") else {
                continue;
            };
            if reviewed >= cutoff {
                continue;
            }

            let age_days = (self.now.date_naive() - reviewed).num_days();
            let doc_type = frontmatter::field(&fm, "content_type")
                .map_or(DocType::Reference, doc_type_from_key);
            // detected_at is the review date itself so long-standing
            // debt outranks fresh debt at equal score.
            let detected_at = reviewed
                .and_hms_opt(0, 0, 0)
                .map_or(self.now, |dt| DateTime::from_naive_utc_and_offset(dt, Utc));
            gaps.push(Gap::new(
                GapSource::Staleness,
                format!("Stale doc: {path}"),
                format!("`{path}` has not been reviewed for {age_days} days."),
                doc_type,
                1,
                detected_at,
            ));
        }
        Ok(gaps)
    }
}

impl GapCollector for StalenessCollector<'_> {
    fn name(&self) -> &'static str {
        "staleness"
    }

    fn collect(&self) -> CollectFuture<'_> {
        let result = self.propose();
        Box::pin(async move { result })
    }
}

/// Maps a frontmatter `content_type` value onto a doc type, defaulting
/// to reference for unknown values.
fn doc_type_from_key(key: &str) -> DocType {
    match key.trim().to_lowercase().as_str() {
        "tutorial" => DocType::Tutorial,
        "how-to" | "howto" => DocType::HowTo,
        "concept" => DocType::Concept,
        "troubleshooting" => DocType::Troubleshooting,
        _ => DocType::Reference,
    }
}
