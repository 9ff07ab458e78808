//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `docgov`.
#[derive(Debug, Parser)]
#[command(name = "docgov", version, about = "Documentation governance gates and gap analysis")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that interface changes ship with doc changes.
    ContractCheck {
        /// Base commit/branch of the change set.
        #[arg(long)]
        base: String,
        /// Head commit/branch of the change set.
        #[arg(long)]
        head: String,
        /// Policy pack YAML path.
        #[arg(long)]
        policy_pack: PathBuf,
        /// Optional path for a JSON copy of the report.
        #[arg(long)]
        json_output: Option<PathBuf>,
    },
    /// Detect API/SDK drift against reference docs.
    DriftCheck {
        /// Base commit/branch of the change set.
        #[arg(long)]
        base: String,
        /// Head commit/branch of the change set.
        #[arg(long)]
        head: String,
        /// Policy pack YAML path.
        #[arg(long)]
        policy_pack: PathBuf,
        /// Path for the JSON report.
        #[arg(long, default_value = "reports/api_sdk_drift_report.json")]
        json_output: PathBuf,
        /// Path for the Markdown report.
        #[arg(long, default_value = "reports/api_sdk_drift_report.md")]
        md_output: PathBuf,
    },
    /// Evaluate KPI SLA thresholds and trend regression.
    KpiSlaEvaluate {
        /// Current KPI snapshot JSON path.
        #[arg(long)]
        current: PathBuf,
        /// Previous KPI snapshot JSON path, for trend checks.
        #[arg(long)]
        previous: Option<PathBuf>,
        /// Policy pack YAML path.
        #[arg(long)]
        policy_pack: PathBuf,
        /// Path for the JSON report.
        #[arg(long, default_value = "reports/kpi-sla-report.json")]
        json_output: PathBuf,
        /// Path for the Markdown report.
        #[arg(long, default_value = "reports/kpi-sla-report.md")]
        md_output: PathBuf,
    },
    /// Build a KPI snapshot by scanning the tracked docs tree.
    KpiSnapshot {
        /// Docs directory to scan.
        #[arg(long, default_value = "docs")]
        docs_dir: String,
        /// Staleness threshold in days.
        #[arg(long, default_value_t = 90)]
        stale_days: i64,
        /// Gap report JSON to fold gap counts from.
        #[arg(long, default_value = "reports/doc_gaps_report.json")]
        gaps_report: PathBuf,
        /// Path for the snapshot JSON.
        #[arg(long, default_value = "reports/kpi-snapshot.json")]
        json_output: PathBuf,
        /// Path for the Markdown KPI wall.
        #[arg(long, default_value = "reports/kpi-wall.md")]
        md_output: PathBuf,
    },
    /// Gap detection and reporting.
    Gaps {
        /// The gaps subcommand to execute.
        #[command(subcommand)]
        command: GapsCommand,
    },
}

/// Subcommands under `docgov gaps`.
#[derive(Debug, Subcommand)]
pub enum GapsCommand {
    /// Run all gap collectors and write the aggregated backlog.
    Analyze {
        /// Policy pack YAML path.
        #[arg(long)]
        policy_pack: PathBuf,
        /// Analyze code changes from the last N days.
        #[arg(long, default_value_t = 7)]
        since: u32,
        /// Base ref override (defaults to `HEAD@{<since> days ago}`).
        #[arg(long)]
        base: Option<String>,
        /// Head ref for the change set.
        #[arg(long, default_value = "HEAD")]
        head: String,
        /// Algolia analytics JSON export path.
        #[arg(long)]
        algolia_json: Option<PathBuf>,
        /// Community topic-feed URL (Discourse JSON); falls back to the
        /// DOCGOV_COMMUNITY_FEED environment variable.
        #[arg(long)]
        community_feed: Option<String>,
        /// Skip the community collector entirely.
        #[arg(long)]
        skip_community: bool,
        /// Docs directory scanned for staleness.
        #[arg(long, default_value = "docs")]
        docs_dir: String,
        /// Staleness threshold in days.
        #[arg(long, default_value_t = 90)]
        stale_days: i64,
        /// Directory receiving the JSON/CSV/Markdown reports.
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, GapsCommand};
    use clap::Parser;

    #[test]
    fn parses_contract_check() {
        let cli = Cli::parse_from([
            "docgov",
            "contract-check",
            "--base",
            "main",
            "--head",
            "feature",
            "--policy-pack",
            "policy.yaml",
        ]);
        match cli.command {
            Command::ContractCheck { base, head, json_output, .. } => {
                assert_eq!(base, "main");
                assert_eq!(head, "feature");
                assert!(json_output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn drift_check_has_default_outputs() {
        let cli = Cli::parse_from([
            "docgov",
            "drift-check",
            "--base",
            "main",
            "--head",
            "HEAD",
            "--policy-pack",
            "policy.yaml",
        ]);
        match cli.command {
            Command::DriftCheck { json_output, md_output, .. } => {
                assert!(json_output.ends_with("api_sdk_drift_report.json"));
                assert!(md_output.ends_with("api_sdk_drift_report.md"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn kpi_sla_evaluate_previous_is_optional() {
        let cli = Cli::parse_from([
            "docgov",
            "kpi-sla-evaluate",
            "--current",
            "kpi.json",
            "--policy-pack",
            "policy.yaml",
        ]);
        match cli.command {
            Command::KpiSlaEvaluate { previous, .. } => assert!(previous.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn gaps_analyze_defaults() {
        let cli =
            Cli::parse_from(["docgov", "gaps", "analyze", "--policy-pack", "policy.yaml"]);
        match cli.command {
            Command::Gaps { command: GapsCommand::Analyze { since, docs_dir, output_dir, .. } } => {
                assert_eq!(since, 7);
                assert_eq!(docs_dir, "docs");
                assert!(output_dir.ends_with("reports"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn missing_required_flag_is_an_error() {
        let result = Cli::try_parse_from(["docgov", "contract-check", "--base", "main"]);
        assert!(result.is_err());
    }
}
