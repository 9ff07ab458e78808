//! Search-analytics gap collector: zero-result queries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::CollectionFailure;
use crate::ports::filesystem::FileSystem;

use super::{infer_doc_type, CollectFuture, Gap, GapCollector, GapSource};

/// Minimum number of searches before a zero-result query becomes a
/// gap. One-off typos are not debt.
pub const MIN_QUERY_COUNT: i64 = 3;

/// Proposes one gap per zero-result search query from an Algolia
/// analytics JSON export.
///
/// An unconfigured collector (no export supplied) contributes an empty
/// list rather than a collection failure: absence of the export is an
/// operator choice, not an outage.
pub struct SearchAnalyticsCollector<'a> {
    fs: &'a dyn FileSystem,
    export_path: Option<PathBuf>,
    min_count: i64,
    now: DateTime<Utc>,
}

/// Shape of the Algolia analytics export. Only the fields the
/// collector reads.
#[derive(Debug, Deserialize)]
struct AnalyticsExport {
    queries: Vec<QueryRow>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    query: String,
    count: i64,
    #[serde(rename = "nbHits")]
    nb_hits: i64,
}

impl<'a> SearchAnalyticsCollector<'a> {
    /// Creates a collector over an optional analytics export.
    #[must_use]
    pub fn new(
        fs: &'a dyn FileSystem,
        export_path: Option<PathBuf>,
        min_count: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self { fs, export_path, min_count, now }
    }

    fn propose(&self) -> Result<Vec<Gap>, CollectionFailure> {
        let Some(path) = &self.export_path else {
            return Ok(Vec::new());
        };
        let fail = |cause: String| CollectionFailure { collector: "search", cause };

        let contents = self
            .fs
            .read_to_string(path)
            .map_err(|e| fail(format!("cannot read {}: {e}", path.display())))?;
        let export: AnalyticsExport = serde_json::from_str(&contents)
            .map_err(|e| fail(format!("cannot parse {}: {e}", path.display())))?;

        Ok(zero_result_gaps(&export.queries, self.min_count, self.now))
    }
}

impl GapCollector for SearchAnalyticsCollector<'_> {
    fn name(&self) -> &'static str {
        "search"
    }

    fn collect(&self) -> CollectFuture<'_> {
        let result = self.propose();
        Box::pin(async move { result })
    }
}

/// Filters query rows down to repeated zero-result searches and maps
/// each into a gap, ordered by search count descending then query.
fn zero_result_gaps(queries: &[QueryRow], min_count: i64, now: DateTime<Utc>) -> Vec<Gap> {
    let mut misses: Vec<&QueryRow> =
        queries.iter().filter(|q| q.nb_hits == 0 && q.count >= min_count).collect();
    misses.sort_by(|a, b| b.count.cmp(&a.count).then(a.query.cmp(&b.query)));

    misses
        .into_iter()
        .map(|row| {
            Gap::new(
                GapSource::SearchAnalytics,
                format!("Search: \"{}\"", row.query),
                format!(
                    "{} searches for \"{}\" returned no results.",
                    row.count, row.query
                ),
                infer_doc_type(&row.query),
                row.count,
                now,
            )
        })
        .collect()
}
