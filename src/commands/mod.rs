//! Command dispatch and handlers.

pub mod contract;
pub mod drift;
pub mod gaps;
pub mod kpi;

use crate::cli::{Command, GapsCommand};
use crate::context::ServiceContext;
use crate::error::GovernanceError;

/// What a completed command found.
///
/// Flagged outcomes (violation, drift, breach) are expected results,
/// not errors; `main` maps them to exit code 1 while fatal errors map
/// to exit code 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Gate passed / thresholds hold / analysis written.
    Clean,
    /// Gate violated, drift detected, or SLA breached.
    Flagged,
}

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns a `GovernanceError` when the selected command fails fatally
/// (bad policy pack, unresolvable ref, unwritable report).
pub fn dispatch(command: &Command, ctx: &ServiceContext) -> Result<Outcome, GovernanceError> {
    match command {
        Command::ContractCheck { base, head, policy_pack, json_output } => {
            contract::run(ctx, base, head, policy_pack, json_output.as_deref())
        }
        Command::DriftCheck { base, head, policy_pack, json_output, md_output } => {
            drift::run(ctx, base, head, policy_pack, json_output, md_output)
        }
        Command::KpiSlaEvaluate { current, previous, policy_pack, json_output, md_output } => {
            kpi::evaluate(ctx, current, previous.as_deref(), policy_pack, json_output, md_output)
        }
        Command::KpiSnapshot { docs_dir, stale_days, gaps_report, json_output, md_output } => {
            kpi::snapshot(ctx, docs_dir, *stale_days, gaps_report, json_output, md_output)
        }
        Command::Gaps { command } => match command {
            GapsCommand::Analyze { .. } => gaps::run(ctx, command),
        },
    }
}
