//! `docgov contract-check` command.

use std::path::Path;

use crate::changeset::{changed_files, classify};
use crate::context::ServiceContext;
use crate::contract::{evaluate_contract, format_contract_report};
use crate::error::GovernanceError;
use crate::policy::PolicyPack;
use crate::report::render_json;

use super::Outcome;

/// Execute the `contract-check` command.
///
/// # Errors
///
/// Returns a `Config` error for a bad policy pack, a `Diff` error for
/// unresolvable refs, and a `Report` error when the optional JSON
/// artifact cannot be written.
pub fn run(
    ctx: &ServiceContext,
    base: &str,
    head: &str,
    policy_pack: &Path,
    json_output: Option<&Path>,
) -> Result<Outcome, GovernanceError> {
    let pack = PolicyPack::load(ctx.fs.as_ref(), policy_pack)?;
    let files = changed_files(ctx.git.as_ref(), base, head)?;
    let total = files.len();
    let classifications = classify(files, &pack);
    let report = evaluate_contract(&classifications);

    if let Some(path) = json_output {
        let json = render_json(&report)?;
        ctx.fs.write(path, &json).map_err(|e| {
            GovernanceError::Report(format!("cannot write {}: {e}", path.display()))
        })?;
    }

    println!("Changed files: {total}");
    println!("{}", format_contract_report(&report));

    Ok(if report.satisfied { Outcome::Clean } else { Outcome::Flagged })
}
