//! Report rendering: JSON, Markdown, and CSV artifacts.
//!
//! Pure formatting layer. Every renderer returns a string and performs
//! no I/O; command handlers decide where artifacts land. JSON and
//! Markdown forms of the same report carry the same logical fields.

use serde::Serialize;

use crate::contract::ContractReport;
use crate::drift::DriftReport;
use crate::error::GovernanceError;
use crate::gaps::aggregate::GapAnalysis;
use crate::kpi::{KpiSnapshot, SlaVerdict};
use crate::policy::SlaThresholds;

/// Serializes any report payload as pretty JSON.
///
/// # Errors
///
/// Returns a `Report` error if serialization fails.
pub fn render_json<T: Serialize>(report: &T) -> Result<String, GovernanceError> {
    serde_json::to_string_pretty(report)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| GovernanceError::Report(format!("cannot serialize report: {e}")))
}

fn path_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- none".to_string();
    }
    items.iter().map(|item| format!("- `{item}`")).collect::<Vec<_>>().join("\n")
}

fn line_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- none".to_string();
    }
    items.iter().map(|item| format!("- {item}")).collect::<Vec<_>>().join("\n")
}

/// Renders a drift report as Markdown.
#[must_use]
pub fn render_drift_markdown(report: &DriftReport) -> String {
    format!(
        "# API/SDK Drift Report\n\n\
         Status: **{status}**\n\n\
         {summary}\n\n\
         ## OpenAPI changes\n\n{openapi}\n\n\
         ## SDK/client changes\n\n{sdk}\n\n\
         ## Reference docs changes\n\n{reference}\n",
        status = if report.is_drift() { "DRIFT" } else { "OK" },
        summary = report.summary,
        openapi = path_list(&report.openapi_changed),
        sdk = path_list(&report.sdk_changed),
        reference = path_list(&report.reference_docs_changed),
    )
}

/// Renders a contract report as Markdown.
#[must_use]
pub fn render_contract_markdown(report: &ContractReport) -> String {
    format!(
        "# Docs Contract Report\n\n\
         Status: **{status}**\n\n\
         ## Interface changes\n\n{interface}\n\n\
         ## Doc changes\n\n{docs}\n",
        status = if report.satisfied { "OK" } else { "VIOLATION" },
        interface = path_list(&report.interface_changed),
        docs = path_list(&report.docs_changed),
    )
}

/// JSON payload for the SLA report: verdict plus the metrics and
/// thresholds it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlaReportDoc<'a> {
    /// The verdict.
    #[serde(flatten)]
    pub verdict: &'a SlaVerdict,
    /// Metrics the checks ran against.
    pub metrics: SlaMetrics,
    /// Thresholds from the policy pack.
    pub thresholds: &'a SlaThresholds,
}

/// The snapshot metrics the SLA checks read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlaMetrics {
    /// Current quality score.
    pub quality_score: i64,
    /// Current stale percentage.
    pub stale_pct: f64,
    /// Current high-priority gap count.
    pub high_priority_gaps: i64,
}

impl<'a> SlaReportDoc<'a> {
    /// Builds the report payload from a verdict and its inputs.
    #[must_use]
    pub fn new(
        verdict: &'a SlaVerdict,
        current: &KpiSnapshot,
        thresholds: &'a SlaThresholds,
    ) -> Self {
        Self {
            verdict,
            metrics: SlaMetrics {
                quality_score: current.quality_score,
                stale_pct: current.stale_pct(),
                high_priority_gaps: current.high_priority_gaps,
            },
            thresholds,
        }
    }
}

/// Renders an SLA verdict as Markdown.
#[must_use]
pub fn render_sla_markdown(doc: &SlaReportDoc<'_>) -> String {
    format!(
        "# KPI SLA Evaluation\n\n\
         Status: **{status}**\n\n\
         {summary}\n\n\
         ## Metrics\n\n\
         - Quality score: {quality}/100\n\
         - Stale docs: {stale:.1}%\n\
         - High-priority gaps: {high}\n\n\
         ## Thresholds\n\n\
         - Minimum quality score: {min_q}\n\
         - Maximum stale percent: {max_s:.1}%\n\
         - Maximum high-priority gaps: {max_g}\n\
         - Maximum quality score drop: {max_d}\n\n\
         ## Breaches\n\n{breaches}\n\n\
         ## Trend notes\n\n{trend}\n",
        status = if doc.verdict.is_breach() { "BREACH" } else { "OK" },
        summary = doc.verdict.summary,
        quality = doc.metrics.quality_score,
        stale = doc.metrics.stale_pct,
        high = doc.metrics.high_priority_gaps,
        min_q = doc.thresholds.min_quality_score,
        max_s = doc.thresholds.max_stale_pct,
        max_g = doc.thresholds.max_high_priority_gaps,
        max_d = doc.thresholds.max_quality_score_drop,
        breaches = line_list(&doc.verdict.breaches),
        trend = line_list(&doc.verdict.trend_notes),
    )
}

/// Renders a KPI snapshot as the Markdown "KPI wall".
#[must_use]
pub fn render_kpi_wall(snapshot: &KpiSnapshot) -> String {
    let mut wall = format!(
        "# Documentation KPI Wall\n\n\
         Generated at: {generated}\n\n\
         - Quality score: **{quality}/100**\n\
         - Total docs: **{total}**\n\
         - Docs with frontmatter: **{frontmatter}**\n\
         - Stale docs: **{stale} ({stale_pct:.1}%)**\n\
         - Open gaps: **{open}** ({high} high priority)\n",
        generated = snapshot.generated_at.to_rfc3339(),
        quality = snapshot.quality_score,
        total = snapshot.total_docs,
        frontmatter = snapshot.docs_with_frontmatter,
        stale = snapshot.stale_docs,
        stale_pct = snapshot.stale_pct(),
        open = snapshot.open_gaps,
        high = snapshot.high_priority_gaps,
    );
    if let Some(notes) = &snapshot.notes {
        wall.push_str(&format!("\n## Notes\n\n{notes}\n"));
    }
    wall
}

/// Renders a gap analysis as Markdown.
#[must_use]
pub fn render_gaps_markdown(analysis: &GapAnalysis) -> String {
    let mut lines = Vec::new();
    lines.push("# Documentation Gap Report".to_string());
    lines.push(String::new());
    lines.push(format!("Generated at: {}", analysis.generated_at.to_rfc3339()));
    lines.push(format!("Sources analyzed: {}", analysis.sources_analyzed.join(", ")));
    lines.push(String::new());

    if !analysis.collection_failures.is_empty() {
        lines.push("## Collection caveats".to_string());
        lines.push(String::new());
        lines.push(line_list(&analysis.collection_failures));
        lines.push(String::new());
    }

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!("- Total gaps: {}", analysis.summary.total));
    lines.push(format!("- High priority: {}", analysis.summary.high_priority));
    lines.push(format!("- Medium priority: {}", analysis.summary.medium_priority));
    lines.push(format!("- Low priority: {}", analysis.summary.low_priority));
    lines.push(String::new());

    lines.push("## Backlog".to_string());
    lines.push(String::new());
    if analysis.gaps.is_empty() {
        lines.push("No gaps detected.".to_string());
    } else {
        lines.push(
            "| ID | Title | Source | Doc type | Priority | Score | Signals | Detected |"
                .to_string(),
        );
        lines.push("|---|---|---|---|---|---|---|---|".to_string());
        for gap in &analysis.gaps {
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {:.1} | {} | {} |",
                gap.id,
                gap.title.replace('|', "\\|"),
                gap.source.key(),
                gap.suggested_doc_type.key(),
                gap.priority.key(),
                gap.score,
                gap.occurrences,
                gap.detected_at.date_naive(),
            ));
        }
        lines.push(String::new());
        lines.push("## Actions".to_string());
        lines.push(String::new());
        for gap in &analysis.gaps {
            lines.push(format!("- **{}**: {}", gap.id, gap.description));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Renders the gap backlog as CSV, one row per gap.
#[must_use]
pub fn render_gaps_csv(analysis: &GapAnalysis) -> String {
    let mut lines = Vec::new();
    lines.push(
        "id,title,source,doc_type,priority,score,occurrences,detected_at,description".to_string(),
    );
    for gap in &analysis.gaps {
        let row = [
            gap.id.clone(),
            gap.title.clone(),
            gap.source.key().to_string(),
            gap.suggested_doc_type.key().to_string(),
            gap.priority.key().to_string(),
            format!("{:.1}", gap.score),
            gap.occurrences.to_string(),
            gap.detected_at.to_rfc3339(),
            gap.description.clone(),
        ];
        lines.push(row.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Quotes a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
