//! End-to-end gate tests against real temporary git repositories.

use std::path::{Path, PathBuf};
use std::process::Command;

fn run_docgov(dir: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_docgov");
    Command::new(bin).current_dir(dir).args(args).output().expect("failed to run docgov binary")
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args(["-c", "user.name=docgov-tests", "-c", "user.email=docgov@example.com"])
        .args(args)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

fn commit_file(dir: &Path, path: &str, contents: &str, message: &str) {
    let full = dir.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, contents).unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", message]);
}

const POLICY_PACK: &str = "\
docs_contract:
  interface_patterns:
    - \"api/**\"
    - \"sdk/**\"
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

/// Creates a repo whose first commit holds a README, a policy pack,
/// and a docs tree, tagged `base`.
fn setup_repo(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("docgov_gates_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    git(&dir, &["init", "-q", "-b", "main"]);
    std::fs::write(dir.join("policy.yaml"), POLICY_PACK).unwrap();
    std::fs::create_dir_all(dir.join("docs/reference")).unwrap();
    std::fs::write(
        dir.join("docs/reference/orders.md"),
        "---\ntitle: Orders\ndescription: Orders API\ncontent_type: reference\nlast_reviewed: 2020-01-01\n---\n# Orders\n",
    )
    .unwrap();
    std::fs::write(dir.join("README.md"), "# Fixture\n").unwrap();
    git(&dir, &["add", "."]);
    git(&dir, &["commit", "-q", "-m", "initial"]);
    git(&dir, &["tag", "base"]);
    dir
}

#[test]
fn contract_gate_blocks_interface_change_without_docs() {
    let dir = setup_repo("contract_block");
    commit_file(&dir, "api/orders.rs", "pub fn orders() {}\n", "add orders endpoint");

    let output = run_docgov(
        &dir,
        &["contract-check", "--base", "base", "--head", "HEAD", "--policy-pack", "policy.yaml"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("Docs contract violated"));
    assert!(stdout.contains("[INTERFACE] api/orders.rs"));
}

#[test]
fn contract_gate_passes_when_docs_change_too() {
    let dir = setup_repo("contract_pass");
    commit_file(&dir, "api/orders.rs", "pub fn orders() {}\n", "add orders endpoint");
    commit_file(&dir, "docs/how-to/orders.md", "# Orders how-to\n", "document orders");

    let output = run_docgov(
        &dir,
        &["contract-check", "--base", "base", "--head", "HEAD", "--policy-pack", "policy.yaml"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("Docs contract check passed."));
}

#[test]
fn contract_gate_ignores_non_interface_changes() {
    let dir = setup_repo("contract_ignore");
    commit_file(&dir, "src/internal.rs", "fn private() {}\n", "internal change");

    let output = run_docgov(
        &dir,
        &["contract-check", "--base", "base", "--head", "HEAD", "--policy-pack", "policy.yaml"],
    );
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn drift_gate_flags_openapi_change_without_reference_docs() {
    let dir = setup_repo("drift_flag");
    commit_file(&dir, "api/openapi.yaml", "openapi: 3.1.0\n", "bump spec");

    let output = run_docgov(
        &dir,
        &["drift-check", "--base", "base", "--head", "HEAD", "--policy-pack", "policy.yaml"],
    );
    assert_eq!(output.status.code(), Some(1));

    let json = std::fs::read_to_string(dir.join("reports/api_sdk_drift_report.json")).unwrap();
    assert!(json.contains("\"status\": \"drift\""));
    assert!(json.contains("api/openapi.yaml"));
    let md = std::fs::read_to_string(dir.join("reports/api_sdk_drift_report.md")).unwrap();
    assert!(md.contains("Status: **DRIFT**"));
}

#[test]
fn drift_gate_passes_with_reference_doc_update() {
    let dir = setup_repo("drift_pass");
    commit_file(&dir, "api/openapi.yaml", "openapi: 3.1.0\n", "bump spec");
    commit_file(&dir, "docs/reference/orders.md", "# Orders v2\n", "update reference");

    let output = run_docgov(
        &dir,
        &["drift-check", "--base", "base", "--head", "HEAD", "--policy-pack", "policy.yaml"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("accompanied by reference docs"));
}

#[test]
fn gaps_analyze_reports_stale_docs_and_search_misses() {
    let dir = setup_repo("gaps_analyze");
    std::fs::write(
        dir.join("algolia.json"),
        r#"{"queries": [{"query": "how to configure webhooks", "count": 12, "nbHits": 0}]}"#,
    )
    .unwrap();

    let output = run_docgov(
        &dir,
        &[
            "gaps",
            "analyze",
            "--policy-pack",
            "policy.yaml",
            "--base",
            "base",
            "--algolia-json",
            "algolia.json",
            "--skip-community",
        ],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("Gap report JSON:"));

    let json = std::fs::read_to_string(dir.join("reports/doc_gaps_report.json")).unwrap();
    // The fixture reference doc was last reviewed in 2020.
    assert!(json.contains("Stale doc: docs/reference/orders.md"));
    assert!(json.contains("Search: \\\"how to configure webhooks\\\""));
    let csv = std::fs::read_to_string(dir.join("reports/doc_gaps_report.csv")).unwrap();
    assert!(csv.lines().count() >= 3);
}

#[test]
fn kpi_snapshot_scans_the_docs_tree() {
    let dir = setup_repo("kpi_snapshot");

    let output = run_docgov(&dir, &["kpi-snapshot", "--docs-dir", "docs"]);
    assert_eq!(output.status.code(), Some(0));

    let json = std::fs::read_to_string(dir.join("reports/kpi-snapshot.json")).unwrap();
    assert!(json.contains("\"total_docs\": 1"));
    assert!(json.contains("\"stale_docs\": 1"));
    let wall = std::fs::read_to_string(dir.join("reports/kpi-wall.md")).unwrap();
    assert!(wall.contains("# Documentation KPI Wall"));
}
