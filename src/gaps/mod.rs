//! Gap model and signal collectors.
//!
//! A gap is a discrete, scored unit of missing or outdated
//! documentation. Four independent collectors propose gaps (code
//! changes, community questions, stale docs, search misses); the
//! aggregator merges, scores, and ranks them into one backlog.

pub mod aggregate;
pub mod code;
pub mod community;
pub mod search;
pub mod staleness;

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::CollectionFailure;

/// Which signal source proposed a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSource {
    /// Derived from a change-set classification.
    CodeChange,
    /// Derived from zero-result search queries.
    SearchAnalytics,
    /// Derived from clustered community questions.
    Community,
    /// Derived from doc review age.
    Staleness,
}

impl GapSource {
    /// Stable lowercase key used in ids and report columns.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::CodeChange => "code_change",
            Self::SearchAnalytics => "search_analytics",
            Self::Community => "community",
            Self::Staleness => "staleness",
        }
    }
}

/// Documentation genre a gap calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocType {
    /// Step-by-step learning path.
    Tutorial,
    /// Goal-oriented guide.
    HowTo,
    /// Explanatory background.
    Concept,
    /// Exhaustive surface description.
    Reference,
    /// Symptom-to-fix guide.
    Troubleshooting,
}

impl DocType {
    /// Stable kebab-case key used in report columns.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Tutorial => "tutorial",
            Self::HowTo => "how-to",
            Self::Concept => "concept",
            Self::Reference => "reference",
            Self::Troubleshooting => "troubleshooting",
        }
    }
}

/// Three-bucket priority band, quantized from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Lowest band.
    Low,
    /// Middle band.
    Medium,
    /// Highest band.
    High,
}

impl Priority {
    /// Stable lowercase key used in report columns.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A unit of documentation debt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gap {
    /// Stable id derived from source and normalized title.
    pub id: String,
    /// Signal source (after merging: the highest-weighted contributor).
    pub source: GapSource,
    /// Short human-readable title; its normalized form is the dedup key.
    pub title: String,
    /// What is missing and what to do about it.
    pub description: String,
    /// Documentation genre to produce.
    pub suggested_doc_type: DocType,
    /// Priority band, recomputed by the aggregator.
    pub priority: Priority,
    /// Score, recomputed by the aggregator (sums across merged sources).
    pub score: f64,
    /// How many raw signals back this gap (diff hunks, questions, searches).
    pub occurrences: i64,
    /// When the signal was first observed.
    pub detected_at: DateTime<Utc>,
}

impl Gap {
    /// Creates a gap candidate with a stable id. Score and priority are
    /// placeholders until the aggregator computes them.
    #[must_use]
    pub fn new(
        source: GapSource,
        title: impl Into<String>,
        description: impl Into<String>,
        suggested_doc_type: DocType,
        occurrences: i64,
        detected_at: DateTime<Utc>,
    ) -> Self {
        let title = title.into();
        let id = gap_id(source, &title);
        Self {
            id,
            source,
            title,
            description: description.into(),
            suggested_doc_type,
            priority: Priority::Low,
            score: 0.0,
            occurrences: occurrences.max(1),
            detected_at,
        }
    }
}

/// Stable gap id: truncated SHA-256 of the source key and dedup key.
#[must_use]
pub fn gap_id(source: GapSource, title: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", source.key(), normalize_title(title)));
    let hex: String = digest.iter().take(6).map(|b| format!("{b:02x}")).collect();
    format!("{}-{hex}", source.key())
}

/// Normalizes a title into a dedup key: lowercase, punctuation
/// stripped, whitespace collapsed.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let lowered: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Future returned by [`GapCollector::collect`].
pub type CollectFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Gap>, CollectionFailure>> + Send + 'a>>;

/// Capability interface over the four gap-signal sources.
///
/// The aggregator treats all sources uniformly: any subset may fail,
/// and a failure degrades that source's contribution to an empty list
/// rather than aborting the run.
pub trait GapCollector: Send + Sync {
    /// Short name used in collection-failure caveats.
    fn name(&self) -> &'static str;

    /// Collects this source's gap candidates.
    fn collect(&self) -> CollectFuture<'_>;
}

/// Topic categories used to bucket community questions and search
/// queries, with the keywords that map text into each.
const CATEGORY_KEYWORDS: [(&str, &[&str]); 10] = [
    ("webhook", &["webhook", "callback", "endpoint", "http trigger"]),
    ("authentication", &["auth", "oauth", "api key", "credential", "token", "login", "sso"]),
    ("error", &["error", "fail", "not working", "issue", "problem", "bug", "broken"]),
    ("integration", &["integrate", "connect", "api", "service"]),
    ("workflow", &["workflow", "automation", "flow", "execute"]),
    ("data", &["data", "json", "transform", "parse", "format"]),
    ("scheduling", &["schedule", "cron", "timer", "interval"]),
    ("deployment", &["deploy", "install", "docker", "kubernetes", "self-host", "cloud"]),
    ("performance", &["slow", "performance", "timeout", "memory", "scale"]),
    ("security", &["security", "permission", "access", "encrypt", "ssl", "https"]),
];

/// Buckets a question or query into a topic category.
#[must_use]
pub(crate) fn categorize(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return category;
        }
    }
    "general"
}

/// Infers the documentation genre a question or query asks for from
/// its phrasing. Checked in order: trouble symptoms first, then how-to
/// phrasing, then concept questions, then reference vocabulary.
#[must_use]
pub(crate) fn infer_doc_type(text: &str) -> DocType {
    let lowered = text.to_lowercase();
    let troubleshooting = ["not working", "error", "fail", "issue", "problem", "can't", "cant",
        "doesn't", "doesnt", "won't", "wont", "stuck", "help"];
    if troubleshooting.iter().any(|p| lowered.contains(p)) {
        return DocType::Troubleshooting;
    }
    let how_to = ["how do", "how can", "how to", "way to", "possible to", "want to", "need to",
        "trying to", "looking for"];
    if how_to.iter().any(|p| lowered.contains(p)) {
        return DocType::HowTo;
    }
    let concept = ["what is", "what are", "difference between", "explain", "understand",
        "why does", "why is", "why do"];
    if concept.iter().any(|p| lowered.contains(p)) {
        return DocType::Concept;
    }
    let reference = ["documentation", "parameter", "option", "configuration", "setting",
        "list of"];
    if reference.iter().any(|p| lowered.contains(p)) {
        return DocType::Reference;
    }
    DocType::HowTo
}
