//! Integration tests for top-level CLI behavior and exit codes.

use std::path::{Path, PathBuf};
use std::process::Command;

fn run_docgov(dir: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_docgov");
    Command::new(bin).current_dir(dir).args(args).output().expect("failed to run docgov binary")
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("docgov_cli_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const POLICY_PACK: &str = "\
docs_contract:
  interface_patterns:
    - \"api/**\"
  doc_patterns:
    - \"docs/**\"
drift:
  openapi_patterns:
    - \"*openapi*.yaml\"
  sdk_patterns:
    - \"sdk/**\"
  reference_doc_patterns:
    - \"docs/reference/**\"
kpi_sla:
  min_quality_score: 80
  max_stale_pct: 15.0
  max_high_priority_gaps: 8
  max_quality_score_drop: 5
";

fn write_pack(dir: &Path) {
    std::fs::write(dir.join("policy.yaml"), POLICY_PACK).unwrap();
}

fn write_snapshot(dir: &Path, name: &str, quality: i64, stale: i64, total: i64, high: i64) {
    let json = format!(
        r#"{{"quality_score": {quality}, "total_docs": {total}, "docs_with_frontmatter": {total},
            "stale_docs": {stale}, "open_gaps": 0, "high_priority_gaps": {high},
            "generated_at": "2025-06-01T00:00:00Z"}}"#
    );
    std::fs::write(dir.join(name), json).unwrap();
}

#[test]
fn help_exits_zero_and_lists_subcommands() {
    let dir = temp_dir("help");
    let output = run_docgov(&dir, &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("contract-check"));
    assert!(stdout.contains("drift-check"));
    assert!(stdout.contains("kpi-sla-evaluate"));
    assert!(stdout.contains("gaps"));
}

#[test]
fn unknown_subcommand_exits_two() {
    let dir = temp_dir("unknown");
    let output = run_docgov(&dir, &["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn missing_policy_pack_exits_two_with_cause() {
    let dir = temp_dir("no_pack");
    let output = run_docgov(
        &dir,
        &["contract-check", "--base", "main", "--head", "HEAD", "--policy-pack", "absent.yaml"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("policy pack error"));
    assert!(stderr.contains("absent.yaml"));
}

#[test]
fn invalid_policy_pack_exits_two() {
    let dir = temp_dir("bad_pack");
    let bad = POLICY_PACK.replace("  doc_patterns:\n    - \"docs/**\"\n", "  doc_patterns: []\n");
    std::fs::write(dir.join("policy.yaml"), bad).unwrap();
    let output = run_docgov(
        &dir,
        &["drift-check", "--base", "main", "--head", "HEAD", "--policy-pack", "policy.yaml"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("doc_patterns"));
}

#[test]
fn kpi_sla_ok_exits_zero_and_writes_reports() {
    let dir = temp_dir("sla_ok");
    write_pack(&dir);
    write_snapshot(&dir, "current.json", 92, 0, 10, 0);

    let output = run_docgov(
        &dir,
        &[
            "kpi-sla-evaluate",
            "--current",
            "current.json",
            "--policy-pack",
            "policy.yaml",
        ],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("KPI SLA check passed."));
    assert!(dir.join("reports/kpi-sla-report.json").exists());
    assert!(dir.join("reports/kpi-sla-report.md").exists());
}

#[test]
fn kpi_sla_breach_exits_one_with_all_reasons() {
    let dir = temp_dir("sla_breach");
    write_pack(&dir);
    write_snapshot(&dir, "current.json", 79, 1, 2, 2);
    write_snapshot(&dir, "previous.json", 88, 0, 2, 0);

    let output = run_docgov(
        &dir,
        &[
            "kpi-sla-evaluate",
            "--current",
            "current.json",
            "--previous",
            "previous.json",
            "--policy-pack",
            "policy.yaml",
        ],
    );
    assert_eq!(output.status.code(), Some(1));

    let json = std::fs::read_to_string(dir.join("reports/kpi-sla-report.json")).unwrap();
    assert!(json.contains("Quality score breach: 79 < 80."));
    assert!(json.contains("Stale docs breach: 50.0% > 15.0%."));
    assert!(json.contains("dropped by 9"));
    // The gap check does not fire: 2 <= 8.
    assert!(!json.contains("High-priority gap breach"));
}

#[test]
fn kpi_sla_missing_snapshot_exits_two() {
    let dir = temp_dir("sla_missing");
    write_pack(&dir);
    let output = run_docgov(
        &dir,
        &["kpi-sla-evaluate", "--current", "absent.json", "--policy-pack", "policy.yaml"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("absent.json"));
}

#[test]
fn contract_check_outside_git_repo_exits_two() {
    let dir = temp_dir("no_repo");
    write_pack(&dir);
    let output = run_docgov(
        &dir,
        &["contract-check", "--base", "main", "--head", "HEAD", "--policy-pack", "policy.yaml"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("diff error"));
}
