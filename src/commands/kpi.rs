//! `docgov kpi-sla-evaluate` and `docgov kpi-snapshot` commands.

use std::path::Path;

use crate::context::ServiceContext;
use crate::error::GovernanceError;
use crate::kpi::{build_snapshot, evaluate_sla, KpiSnapshot};
use crate::policy::PolicyPack;
use crate::report::{render_json, render_kpi_wall, render_sla_markdown, SlaReportDoc};

use super::Outcome;

/// Execute the `kpi-sla-evaluate` command.
///
/// # Errors
///
/// Returns a `Config` error for a bad policy pack, an `Input` error
/// for unreadable snapshots, and a `Report` error when an artifact
/// cannot be written.
pub fn evaluate(
    ctx: &ServiceContext,
    current: &Path,
    previous: Option<&Path>,
    policy_pack: &Path,
    json_output: &Path,
    md_output: &Path,
) -> Result<Outcome, GovernanceError> {
    let pack = PolicyPack::load(ctx.fs.as_ref(), policy_pack)?;
    let current = KpiSnapshot::load(ctx.fs.as_ref(), current)?;
    let previous = previous.map(|path| KpiSnapshot::load(ctx.fs.as_ref(), path)).transpose()?;

    let verdict = evaluate_sla(&current, previous.as_ref(), &pack.sla);
    let doc = SlaReportDoc::new(&verdict, &current, &pack.sla);

    let write = |path: &Path, contents: &str| {
        ctx.fs.write(path, contents).map_err(|e| {
            GovernanceError::Report(format!("cannot write {}: {e}", path.display()))
        })
    };
    write(json_output, &render_json(&doc)?)?;
    write(md_output, &render_sla_markdown(&doc))?;

    println!("KPI SLA JSON report: {}", json_output.display());
    println!("KPI SLA Markdown report: {}", md_output.display());
    println!("{}", verdict.summary);

    Ok(if verdict.is_breach() { Outcome::Flagged } else { Outcome::Clean })
}

/// Execute the `kpi-snapshot` command.
///
/// Scans the tracked docs tree, folds in gap counts from the latest
/// gap report when one exists, and writes the snapshot JSON plus the
/// Markdown KPI wall.
///
/// # Errors
///
/// Returns an `Input` error when the docs tree cannot be scanned and a
/// `Report` error when an artifact cannot be written.
pub fn snapshot(
    ctx: &ServiceContext,
    docs_dir: &str,
    stale_days: i64,
    gaps_report: &Path,
    json_output: &Path,
    md_output: &Path,
) -> Result<Outcome, GovernanceError> {
    let (open_gaps, high_priority_gaps) = load_gap_counts(ctx, gaps_report);
    let snapshot = build_snapshot(
        ctx.fs.as_ref(),
        ctx.git.as_ref(),
        docs_dir,
        stale_days,
        open_gaps,
        high_priority_gaps,
        ctx.clock.now(),
    )?;

    let write = |path: &Path, contents: &str| {
        ctx.fs.write(path, contents).map_err(|e| {
            GovernanceError::Report(format!("cannot write {}: {e}", path.display()))
        })
    };
    write(json_output, &render_json(&snapshot)?)?;
    write(md_output, &render_kpi_wall(&snapshot))?;

    println!("KPI snapshot: {}", json_output.display());
    println!("KPI wall: {}", md_output.display());
    println!(
        "Quality score {}/100, {} docs, {} stale.",
        snapshot.quality_score, snapshot.total_docs, snapshot.stale_docs
    );

    Ok(Outcome::Clean)
}

/// Reads `(open, high_priority)` gap counts from a gap report.
///
/// A missing or unreadable report contributes zeros: the snapshot
/// command must work before the first gap analysis has ever run.
fn load_gap_counts(ctx: &ServiceContext, path: &Path) -> (i64, i64) {
    let Ok(contents) = ctx.fs.read_to_string(path) else {
        return (0, 0);
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&contents) else {
        return (0, 0);
    };
    let summary = &value["summary"];
    (
        summary["total"].as_i64().unwrap_or(0),
        summary["high_priority"].as_i64().unwrap_or(0),
    )
}
