//! Gap aggregation: merge, score, and rank the four signal sources.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CollectionFailure;

use super::{gap_id, normalize_title, Gap, GapSource, Priority};

/// Base confidence weight per source. Code-derived gaps are
/// structurally certain; staleness is the weakest signal since old
/// does not always mean wrong.
pub const BASE_WEIGHT_CODE_CHANGE: f64 = 100.0;
/// Base weight for zero-result search queries.
pub const BASE_WEIGHT_SEARCH_ANALYTICS: f64 = 80.0;
/// Base weight for repeated community questions.
pub const BASE_WEIGHT_COMMUNITY: f64 = 70.0;
/// Base weight for stale docs.
pub const BASE_WEIGHT_STALENESS: f64 = 40.0;

/// Linear score accrual per day a signal has been outstanding.
pub const AGE_BONUS_PER_DAY: f64 = 0.1;
/// Age accrual stops after this many days.
pub const AGE_BONUS_CAP_DAYS: i64 = 180;
/// Linear score accrual per raw signal beyond the first.
pub const VOLUME_BONUS_PER_EXTRA: f64 = 2.0;
/// Volume accrual cap.
pub const VOLUME_BONUS_CAP: f64 = 40.0;

/// Scores at or above this band as high priority. Banding cutoffs are
/// a reporting concern owned by this module, not a policy-pack
/// threshold.
pub const HIGH_PRIORITY_CUTOFF: f64 = 100.0;
/// Scores at or above this (and below high) band as medium priority.
pub const MEDIUM_PRIORITY_CUTOFF: f64 = 60.0;

/// Base weight for a source.
#[must_use]
pub fn base_weight(source: GapSource) -> f64 {
    match source {
        GapSource::CodeChange => BASE_WEIGHT_CODE_CHANGE,
        GapSource::SearchAnalytics => BASE_WEIGHT_SEARCH_ANALYTICS,
        GapSource::Community => BASE_WEIGHT_COMMUNITY,
        GapSource::Staleness => BASE_WEIGHT_STALENESS,
    }
}

/// Scores a single (unmerged) gap: base weight plus linear age and
/// volume bonuses, both capped. Everything is linear so an operator
/// can reconstruct any score by hand.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_gap(gap: &Gap, now: DateTime<Utc>) -> f64 {
    let age_days = (now - gap.detected_at).num_days().clamp(0, AGE_BONUS_CAP_DAYS);
    let age_bonus = age_days as f64 * AGE_BONUS_PER_DAY;
    let volume_bonus =
        ((gap.occurrences - 1).max(0) as f64 * VOLUME_BONUS_PER_EXTRA).min(VOLUME_BONUS_CAP);
    base_weight(gap.source) + age_bonus + volume_bonus
}

/// Quantizes a score into the three-band priority.
#[must_use]
pub fn band(score: f64) -> Priority {
    if score >= HIGH_PRIORITY_CUTOFF {
        Priority::High
    } else if score >= MEDIUM_PRIORITY_CUTOFF {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Roll-up counts for the report header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapSummary {
    /// Total gaps after dedup.
    pub total: usize,
    /// Gaps in the high band.
    pub high_priority: usize,
    /// Gaps in the medium band.
    pub medium_priority: usize,
    /// Gaps in the low band.
    pub low_priority: usize,
    /// Gap count per source key.
    pub by_source: BTreeMap<String, usize>,
    /// Gap count per suggested doc type.
    pub by_doc_type: BTreeMap<String, usize>,
}

/// The aggregated backlog for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysis {
    /// When the run happened.
    pub generated_at: DateTime<Utc>,
    /// Sources that contributed successfully, in pipeline order.
    pub sources_analyzed: Vec<String>,
    /// Caveats for sources that failed; the backlog below is still
    /// complete for every source that succeeded.
    pub collection_failures: Vec<String>,
    /// Roll-up counts.
    pub summary: GapSummary,
    /// The deduplicated backlog, highest score first.
    pub gaps: Vec<Gap>,
}

/// Merges the four collector outcomes into one scored, deduplicated,
/// deterministically ordered backlog.
///
/// Gaps sharing a normalized title merge into one record: scores sum
/// (corroboration by independent signals outranks any single signal),
/// the highest-weighted source wins the record's identity, and the
/// earliest detection time is kept. Output is sorted score descending,
/// ties broken by detection time ascending (oldest debt first), then
/// id. Identical inputs produce identical output.
#[must_use]
pub fn aggregate(
    code: Result<Vec<Gap>, CollectionFailure>,
    community: Result<Vec<Gap>, CollectionFailure>,
    staleness: Result<Vec<Gap>, CollectionFailure>,
    search: Result<Vec<Gap>, CollectionFailure>,
    now: DateTime<Utc>,
) -> GapAnalysis {
    let mut sources_analyzed = Vec::new();
    let mut collection_failures = Vec::new();
    let mut candidates: Vec<Gap> = Vec::new();

    for (name, outcome) in [
        ("code", code),
        ("community", community),
        ("staleness", staleness),
        ("search", search),
    ] {
        match outcome {
            Ok(gaps) => {
                sources_analyzed.push(name.to_string());
                candidates.extend(gaps);
            }
            Err(failure) => collection_failures.push(failure.to_string()),
        }
    }

    let mut merged: Vec<(String, Gap)> = Vec::new();
    for mut gap in candidates {
        gap.score = score_gap(&gap, now);
        let key = normalize_title(&gap.title);
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.score += gap.score;
                existing.occurrences += gap.occurrences;
                existing.detected_at = existing.detected_at.min(gap.detected_at);
                if base_weight(gap.source) > base_weight(existing.source) {
                    existing.source = gap.source;
                    existing.title = gap.title;
                    existing.description = gap.description;
                    existing.suggested_doc_type = gap.suggested_doc_type;
                }
                existing.id = gap_id(existing.source, &existing.title);
            }
            None => merged.push((key, gap)),
        }
    }

    let mut gaps: Vec<Gap> = merged.into_iter().map(|(_, g)| g).collect();
    for gap in &mut gaps {
        gap.priority = band(gap.score);
    }
    gaps.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.detected_at.cmp(&b.detected_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let summary = summarize(&gaps);
    GapAnalysis { generated_at: now, sources_analyzed, collection_failures, summary, gaps }
}

fn summarize(gaps: &[Gap]) -> GapSummary {
    let mut by_source = BTreeMap::new();
    let mut by_doc_type = BTreeMap::new();
    let mut high = 0;
    let mut medium = 0;
    let mut low = 0;

    for gap in gaps {
        *by_source.entry(gap.source.key().to_string()).or_insert(0) += 1;
        *by_doc_type.entry(gap.suggested_doc_type.key().to_string()).or_insert(0) += 1;
        match gap.priority {
            Priority::High => high += 1,
            Priority::Medium => medium += 1,
            Priority::Low => low += 1,
        }
    }

    GapSummary {
        total: gaps.len(),
        high_priority: high,
        medium_priority: medium,
        low_priority: low,
        by_source,
        by_doc_type,
    }
}
