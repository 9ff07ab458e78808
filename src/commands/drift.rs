//! `docgov drift-check` command.

use std::path::Path;

use crate::changeset::{changed_files, classify};
use crate::context::ServiceContext;
use crate::drift::evaluate_drift;
use crate::error::GovernanceError;
use crate::policy::PolicyPack;
use crate::report::{render_drift_markdown, render_json};

use super::Outcome;

/// Execute the `drift-check` command.
///
/// Writes the JSON and Markdown artifacts even when the verdict is OK
/// so operators always have the latest report to diff against.
///
/// # Errors
///
/// Returns a `Config` error for a bad policy pack, a `Diff` error for
/// unresolvable refs, and a `Report` error when an artifact cannot be
/// written.
pub fn run(
    ctx: &ServiceContext,
    base: &str,
    head: &str,
    policy_pack: &Path,
    json_output: &Path,
    md_output: &Path,
) -> Result<Outcome, GovernanceError> {
    let pack = PolicyPack::load(ctx.fs.as_ref(), policy_pack)?;
    let files = changed_files(ctx.git.as_ref(), base, head)?;
    let classifications = classify(files, &pack);
    let report = evaluate_drift(&classifications);

    let write = |path: &Path, contents: &str| {
        ctx.fs.write(path, contents).map_err(|e| {
            GovernanceError::Report(format!("cannot write {}: {e}", path.display()))
        })
    };
    write(json_output, &render_json(&report)?)?;
    write(md_output, &render_drift_markdown(&report))?;

    println!("Drift report JSON: {}", json_output.display());
    println!("Drift report Markdown: {}", md_output.display());
    println!("{}", report.summary);

    Ok(if report.is_drift() { Outcome::Flagged } else { Outcome::Clean })
}
