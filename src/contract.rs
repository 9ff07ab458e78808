//! Docs contract gate: interface changes must ship with doc changes.

use serde::Serialize;

use crate::changeset::{FileClassification, Label};

/// Outcome of the docs contract check for one change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractReport {
    /// Interface-labeled files in the change set.
    pub interface_changed: Vec<String>,
    /// Doc-labeled files in the change set.
    pub docs_changed: Vec<String>,
    /// `true` unless interface files changed with zero doc changes.
    pub satisfied: bool,
}

/// Evaluates the docs contract over a classified change set.
///
/// The rule is file-count-based, not path-correlated: any doc change in
/// the same change set satisfies any interface change. Coarse on
/// purpose; the gate favors low false-negative noise over precise
/// interface-to-doc traceability, and tightening it would change gate
/// behavior materially.
#[must_use]
pub fn evaluate_contract(classifications: &[FileClassification]) -> ContractReport {
    let interface_changed: Vec<String> = classifications
        .iter()
        .filter(|c| c.has(Label::Interface))
        .map(|c| c.file.path.clone())
        .collect();
    let docs_changed: Vec<String> = classifications
        .iter()
        .filter(|c| c.has(Label::Doc))
        .map(|c| c.file.path.clone())
        .collect();

    let satisfied = interface_changed.is_empty() || !docs_changed.is_empty();
    ContractReport { interface_changed, docs_changed, satisfied }
}

/// Formats a contract report as a human-readable explanation.
#[must_use]
pub fn format_contract_report(report: &ContractReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Interface files changed: {}", report.interface_changed.len()));
    lines.push(format!("Doc files changed: {}", report.docs_changed.len()));

    if report.satisfied {
        lines.push("Docs contract check passed.".to_string());
    } else {
        lines.push("Docs contract violated: interface changed without a docs update.".to_string());
        for path in &report.interface_changed {
            lines.push(format!("  [INTERFACE] {path}"));
        }
        lines.push("  No doc-labeled files were changed in this change set.".to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::{classify, ChangeType, ChangedFile};
    use crate::policy::sample_pack;

    fn classify_paths(paths: &[&str]) -> Vec<FileClassification> {
        let pack = sample_pack();
        let files = paths
            .iter()
            .map(|p| ChangedFile { path: (*p).to_string(), change_type: ChangeType::Modified })
            .collect();
        classify(files, &pack)
    }

    #[test]
    fn no_interface_change_is_trivially_satisfied() {
        let report = evaluate_contract(&classify_paths(&["src/lib.rs", "README.md"]));
        assert!(report.satisfied);
        assert!(report.interface_changed.is_empty());
    }

    #[test]
    fn no_interface_change_satisfied_even_without_docs() {
        let report = evaluate_contract(&classify_paths(&[]));
        assert!(report.satisfied);
    }

    #[test]
    fn interface_without_docs_is_violation() {
        let report = evaluate_contract(&classify_paths(&["api/orders.rs", "src/util.rs"]));
        assert!(!report.satisfied);
        assert_eq!(report.interface_changed, vec!["api/orders.rs"]);
        assert!(report.docs_changed.is_empty());
    }

    #[test]
    fn any_doc_change_satisfies_any_interface_change() {
        // File-count rule: the doc does not have to correspond to the
        // interface file.
        let report =
            evaluate_contract(&classify_paths(&["api/orders.rs", "docs/unrelated/faq.md"]));
        assert!(report.satisfied);
    }

    #[test]
    fn spec_scenario_openapi_with_reference_doc() {
        let report =
            evaluate_contract(&classify_paths(&["api/openapi.yaml", "docs/reference/orders.md"]));
        assert!(report.satisfied);
        assert_eq!(report.interface_changed, vec!["api/openapi.yaml"]);
        assert_eq!(report.docs_changed, vec!["docs/reference/orders.md"]);
    }

    #[test]
    fn violation_report_lists_interface_files() {
        let report = evaluate_contract(&classify_paths(&["api/orders.rs"]));
        let text = format_contract_report(&report);
        assert!(text.contains("[INTERFACE] api/orders.rs"));
        assert!(text.contains("No doc-labeled files"));
    }

    #[test]
    fn satisfied_report_mentions_pass() {
        let report = evaluate_contract(&classify_paths(&["docs/guide.md"]));
        let text = format_contract_report(&report);
        assert!(text.contains("passed"));
    }
}
