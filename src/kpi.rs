//! KPI snapshots and SLA evaluation.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::frontmatter;
use crate::policy::SlaThresholds;
use crate::ports::filesystem::FileSystem;
use crate::ports::git::GitRepo;

/// Frontmatter fields every published doc is expected to carry.
const REQUIRED_FIELDS: [&str; 3] = ["title", "description", "content_type"];

/// Point-in-time scorecard of documentation health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Composite quality score, 0-100.
    pub quality_score: i64,
    /// Total markdown docs counted.
    pub total_docs: i64,
    /// Docs carrying a parsable frontmatter block.
    pub docs_with_frontmatter: i64,
    /// Docs whose `last_reviewed` is older than the staleness window.
    pub stale_docs: i64,
    /// Open gaps in the latest gap report.
    pub open_gaps: i64,
    /// High-priority gaps in the latest gap report.
    pub high_priority_gaps: i64,
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    /// Free-text executive notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl KpiSnapshot {
    /// Stale docs as a percentage of all docs (0 when there are no docs).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stale_pct(&self) -> f64 {
        if self.total_docs <= 0 {
            return 0.0;
        }
        self.stale_docs as f64 / self.total_docs as f64 * 100.0
    }

    /// Loads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an `Input` error if the file is absent or unparsable.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, GovernanceError> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| GovernanceError::Input(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| GovernanceError::Input(format!("cannot parse {}: {e}", path.display())))
    }
}

/// SLA verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaStatus {
    /// All thresholds hold.
    Ok,
    /// At least one threshold is violated.
    Breach,
}

/// Result of evaluating a snapshot against SLA thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlaVerdict {
    /// Overall verdict.
    pub status: SlaStatus,
    /// One-line outcome.
    pub summary: String,
    /// One entry per violated threshold; empty iff status is OK.
    pub breaches: Vec<String>,
    /// Trend observations versus the previous snapshot.
    pub trend_notes: Vec<String>,
}

impl SlaVerdict {
    /// Returns `true` when the verdict is a breach.
    #[must_use]
    pub fn is_breach(&self) -> bool {
        self.status == SlaStatus::Breach
    }
}

/// Evaluates a snapshot against thresholds and an optional prior
/// snapshot.
///
/// Total and side-effect-free: every check runs (no short-circuit) so a
/// single run reports the complete list of problems, and the function
/// never fails.
#[must_use]
pub fn evaluate_sla(
    current: &KpiSnapshot,
    previous: Option<&KpiSnapshot>,
    thresholds: &SlaThresholds,
) -> SlaVerdict {
    let mut breaches = Vec::new();
    let mut trend_notes = Vec::new();

    if current.quality_score < thresholds.min_quality_score {
        breaches.push(format!(
            "Quality score breach: {} < {}.",
            current.quality_score, thresholds.min_quality_score
        ));
    }

    let stale_pct = current.stale_pct();
    if stale_pct > thresholds.max_stale_pct {
        breaches.push(format!(
            "Stale docs breach: {stale_pct:.1}% > {:.1}%.",
            thresholds.max_stale_pct
        ));
    }

    if current.high_priority_gaps > thresholds.max_high_priority_gaps {
        breaches.push(format!(
            "High-priority gap breach: {} > {}.",
            current.high_priority_gaps, thresholds.max_high_priority_gaps
        ));
    }

    if let Some(previous) = previous {
        let drop = previous.quality_score - current.quality_score;
        if drop > thresholds.max_quality_score_drop {
            breaches.push(format!(
                "Quality trend breach: dropped by {drop} points (max allowed {}).",
                thresholds.max_quality_score_drop
            ));
        }
        trend_notes.push(format!(
            "Quality score trend: previous {}, current {}.",
            previous.quality_score, current.quality_score
        ));
    }

    let status = if breaches.is_empty() { SlaStatus::Ok } else { SlaStatus::Breach };
    let summary = match status {
        SlaStatus::Ok => "KPI SLA check passed.".to_string(),
        SlaStatus::Breach => "SLA thresholds breached.".to_string(),
    };

    SlaVerdict { status, summary, breaches, trend_notes }
}

/// Composite quality score from metadata completeness, staleness, and
/// high-priority gap pressure. Deductions are linear and capped so no
/// single dimension can zero the score on its own.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn compute_quality_score(metadata_pct: f64, stale_pct: f64, high_gaps: i64) -> i64 {
    let mut score = 100;
    score -= ((100.0 - metadata_pct) * 0.35).round() as i64;
    score -= (stale_pct * 0.30).round() as i64;
    score -= (high_gaps * 3).min(25);
    score.clamp(0, 100)
}

/// Builds a snapshot by scanning the tracked docs tree.
///
/// Counts frontmatter coverage and required-field completeness
/// (`title`, `description`, `content_type`), ages each doc's
/// `last_reviewed` against the staleness window, and folds in gap
/// counts from the latest gap report.
///
/// # Errors
///
/// Returns an `Input` error when the docs tree cannot be listed or a
/// doc cannot be read.
#[allow(clippy::cast_precision_loss)]
pub fn build_snapshot(
    fs: &dyn FileSystem,
    git: &dyn GitRepo,
    docs_dir: &str,
    stale_days: i64,
    open_gaps: i64,
    high_priority_gaps: i64,
    now: DateTime<Utc>,
) -> Result<KpiSnapshot, GovernanceError> {
    let pathspec = format!("{}/*.md", docs_dir.trim_end_matches('/'));
    let files = git
        .list_files(&pathspec)
        .map_err(|e| GovernanceError::Input(format!("cannot list docs under {docs_dir}: {e}")))?;
    let files: Vec<&String> = files.iter().filter(|p| !p.contains("assets/")).collect();

    let total_docs = files.len() as i64;
    let mut docs_with_frontmatter = 0_i64;
    let mut required_total = 0_i64;
    let mut required_present = 0_i64;
    let mut stale_docs = 0_i64;

    let stale_cutoff = now.date_naive() - Duration::days(stale_days);
    for path in files {
        let text = fs
            .read_to_string(Path::new(path))
            .map_err(|e| GovernanceError::Input(format!("cannot read {path}: {e}")))?;
        let Some(fm) = frontmatter::parse(&text) else {
            continue;
        };
        docs_with_frontmatter += 1;

        for field in REQUIRED_FIELDS {
            required_total += 1;
            if frontmatter::field(&fm, field).is_some() {
                required_present += 1;
            }
        }

        if let Some(reviewed) = frontmatter::date_field(&fm, "last_reviewed") {
            if reviewed < stale_cutoff {
                stale_docs += 1;
            }
        }
    }

    let metadata_pct = if required_total > 0 {
        required_present as f64 / required_total as f64 * 100.0
    } else {
        0.0
    };
    let stale_pct = if total_docs > 0 { stale_docs as f64 / total_docs as f64 * 100.0 } else { 0.0 };
    let quality_score = compute_quality_score(metadata_pct, stale_pct, high_priority_gaps);

    let notes = if open_gaps == 0 {
        "No active gaps in the latest report.".to_string()
    } else if high_priority_gaps == 0 {
        format!("{open_gaps} total gaps, no high-priority gaps.")
    } else {
        format!("{open_gaps} total gaps, {high_priority_gaps} high-priority gaps need SLA attention.")
    };

    Ok(KpiSnapshot {
        quality_score,
        total_docs,
        docs_with_frontmatter,
        stale_docs,
        open_gaps,
        high_priority_gaps,
        generated_at: now,
        notes: Some(notes),
    })
}
