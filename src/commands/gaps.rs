//! `docgov gaps analyze` command.

use std::path::Path;

use crate::changeset::{changed_files, classify};
use crate::cli::GapsCommand;
use crate::context::ServiceContext;
use crate::error::{CollectionFailure, GovernanceError};
use crate::gaps::aggregate::aggregate;
use crate::gaps::code::CodeChangeCollector;
use crate::gaps::community::{CommunityCollector, MIN_TOPIC_REPEATS};
use crate::gaps::search::{SearchAnalyticsCollector, MIN_QUERY_COUNT};
use crate::gaps::staleness::StalenessCollector;
use crate::gaps::GapCollector;
use crate::policy::PolicyPack;
use crate::report::{render_gaps_csv, render_gaps_markdown, render_json};

use super::Outcome;

/// Environment variable naming the community topic-feed URL.
const COMMUNITY_FEED_ENV: &str = "DOCGOV_COMMUNITY_FEED";

/// Execute the `gaps analyze` command.
///
/// The four collectors run concurrently; any of them may fail without
/// aborting the run. Reports are written even when some sources failed
/// so operators always have something to act on, and the failures are
/// recorded in the report as caveats.
///
/// # Errors
///
/// Returns a `Config` error for a bad policy pack and a `Report` error
/// when an artifact cannot be written. Collector failures are not
/// errors.
pub fn run(ctx: &ServiceContext, command: &GapsCommand) -> Result<Outcome, GovernanceError> {
    let GapsCommand::Analyze {
        policy_pack,
        since,
        base,
        head,
        algolia_json,
        community_feed,
        skip_community,
        docs_dir,
        stale_days,
        output_dir,
    } = command;

    let pack = PolicyPack::load(ctx.fs.as_ref(), policy_pack)?;
    let now = ctx.clock.now();

    // Code collector input: the change set since the analysis window
    // opened. A ref that cannot be resolved degrades the source rather
    // than failing the periodic run.
    let base_ref =
        base.clone().unwrap_or_else(|| format!("HEAD@{{{since} days ago}}"));
    let code_collector = changed_files(ctx.git.as_ref(), &base_ref, head)
        .map(|files| CodeChangeCollector::new(classify(files, &pack), now))
        .map_err(|e| CollectionFailure { collector: "code", cause: e.to_string() });

    let feed_url = community_feed
        .clone()
        .or_else(|| std::env::var(COMMUNITY_FEED_ENV).ok())
        .filter(|_| !skip_community);
    let community_collector =
        feed_url.map(|url| CommunityCollector::new(url, MIN_TOPIC_REPEATS, now));

    let staleness_collector =
        StalenessCollector::new(ctx.fs.as_ref(), ctx.git.as_ref(), docs_dir.clone(), *stale_days, now);
    let search_collector =
        SearchAnalyticsCollector::new(ctx.fs.as_ref(), algolia_json.clone(), MIN_QUERY_COUNT, now);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| GovernanceError::Report(format!("cannot start async runtime: {e}")))?;
    let (code, community, staleness, search) = runtime.block_on(async {
        let code = async {
            match &code_collector {
                Ok(collector) => collector.collect().await,
                Err(failure) => Err(failure.clone()),
            }
        };
        let community = async {
            match &community_collector {
                Some(collector) => collector.collect().await,
                None => Ok(Vec::new()),
            }
        };
        tokio::join!(code, community, staleness_collector.collect(), search_collector.collect())
    });

    let analysis = aggregate(code, community, staleness, search, now);

    for failure in &analysis.collection_failures {
        eprintln!("Warning: {failure}");
    }

    let write = |path: &Path, contents: &str| {
        ctx.fs.write(path, contents).map_err(|e| {
            GovernanceError::Report(format!("cannot write {}: {e}", path.display()))
        })
    };
    let json_path = output_dir.join("doc_gaps_report.json");
    let csv_path = output_dir.join("doc_gaps_report.csv");
    let md_path = output_dir.join("doc_gaps_report.md");
    write(&json_path, &render_json(&analysis)?)?;
    write(&csv_path, &render_gaps_csv(&analysis))?;
    write(&md_path, &render_gaps_markdown(&analysis))?;

    println!("Gap report JSON: {}", json_path.display());
    println!("Gap report CSV: {}", csv_path.display());
    println!("Gap report Markdown: {}", md_path.display());
    println!(
        "{} gaps ({} high, {} medium, {} low).",
        analysis.summary.total,
        analysis.summary.high_priority,
        analysis.summary.medium_priority,
        analysis.summary.low_priority
    );

    Ok(Outcome::Clean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use clap::Parser;

    use crate::cli::{Cli, Command};
    use crate::context::test_support::{fixed_context, MemFs, ScriptedGit};
    use crate::policy::SAMPLE_PACK_YAML;

    fn analyze_command(extra: &[&str]) -> GapsCommand {
        let mut args =
            vec!["docgov", "gaps", "analyze", "--policy-pack", "pack.yaml", "--skip-community"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Command::Gaps { command } => command,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn stale_doc() -> &'static str {
        "---\ntitle: T\ndescription: d\ncontent_type: how-to\nlast_reviewed: 2024-01-01\n---\n"
    }

    #[test]
    fn analyze_writes_all_three_artifacts() {
        let mut ctx = fixed_context();
        ctx.fs = Box::new(
            MemFs::new().seed("pack.yaml", SAMPLE_PACK_YAML).seed("docs/old.md", stale_doc()),
        );
        ctx.git = Box::new(ScriptedGit {
            diff_output: Ok("A\tapi/orders.rs\n".to_string()),
            tracked_files: vec!["docs/old.md".to_string()],
        });

        let outcome = run(&ctx, &analyze_command(&[])).unwrap();
        assert_eq!(outcome, Outcome::Clean);

        let json = ctx.fs.read_to_string(&PathBuf::from("reports/doc_gaps_report.json")).unwrap();
        assert!(json.contains("Undocumented interface change: api/orders.rs"));
        assert!(json.contains("Stale doc: docs/old.md"));
        let csv = ctx.fs.read_to_string(&PathBuf::from("reports/doc_gaps_report.csv")).unwrap();
        assert!(csv.starts_with("id,title,source"));
        let md = ctx.fs.read_to_string(&PathBuf::from("reports/doc_gaps_report.md")).unwrap();
        assert!(md.contains("# Documentation Gap Report"));
    }

    #[test]
    fn unresolvable_base_ref_degrades_code_source() {
        let mut ctx = fixed_context();
        ctx.fs = Box::new(
            MemFs::new().seed("pack.yaml", SAMPLE_PACK_YAML).seed("docs/old.md", stale_doc()),
        );
        ctx.git = Box::new(ScriptedGit {
            diff_output: Err("unknown revision".to_string()),
            tracked_files: vec!["docs/old.md".to_string()],
        });

        let outcome = run(&ctx, &analyze_command(&[])).unwrap();
        assert_eq!(outcome, Outcome::Clean);

        let json = ctx.fs.read_to_string(&PathBuf::from("reports/doc_gaps_report.json")).unwrap();
        assert!(json.contains("code collector failed"));
        assert!(json.contains("Stale doc: docs/old.md"));
    }

    #[test]
    fn algolia_export_feeds_search_gaps() {
        let export = r#"{"queries": [{"query": "how to rotate keys", "count": 9, "nbHits": 0}]}"#;
        let mut ctx = fixed_context();
        ctx.fs = Box::new(
            MemFs::new().seed("pack.yaml", SAMPLE_PACK_YAML).seed("algolia.json", export),
        );
        ctx.git = Box::new(ScriptedGit {
            diff_output: Ok(String::new()),
            tracked_files: vec![],
        });

        run(&ctx, &analyze_command(&["--algolia-json", "algolia.json"])).unwrap();

        let json = ctx.fs.read_to_string(&PathBuf::from("reports/doc_gaps_report.json")).unwrap();
        assert!(json.contains("Search: \\\"how to rotate keys\\\""));
    }

    #[test]
    fn bad_policy_pack_is_fatal() {
        let ctx = fixed_context();
        let err = run(&ctx, &analyze_command(&[])).unwrap_err();
        assert!(matches!(err, GovernanceError::Config(_)));
    }
}
