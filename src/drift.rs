//! Drift detection: API/SDK surface changed without reference docs.

use serde::Serialize;

use crate::changeset::{FileClassification, Label};

/// Drift verdict for one change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftStatus {
    /// No unaccompanied API/SDK change.
    Ok,
    /// API/SDK surface changed and reference docs did not.
    Drift,
}

/// Structured drift report over a classified change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    /// Verdict.
    pub status: DriftStatus,
    /// One-line explanation of the verdict.
    pub summary: String,
    /// OpenAPI/Swagger spec files that changed.
    pub openapi_changed: Vec<String>,
    /// SDK/client files that changed.
    pub sdk_changed: Vec<String>,
    /// Reference documentation files that changed.
    pub reference_docs_changed: Vec<String>,
}

impl DriftReport {
    /// Returns `true` when the verdict is drift.
    #[must_use]
    pub fn is_drift(&self) -> bool {
        self.status == DriftStatus::Drift
    }
}

/// Evaluates drift over a classified change set.
///
/// Drift exists when OpenAPI or SDK files changed and no reference doc
/// changed alongside them. Adding a reference-doc change can only move
/// the verdict toward OK, never away from it. Pure function so it is
/// testable independently of the classifier.
#[must_use]
pub fn evaluate_drift(classifications: &[FileClassification]) -> DriftReport {
    let select = |label: Label| -> Vec<String> {
        classifications
            .iter()
            .filter(|c| c.has(label))
            .map(|c| c.file.path.clone())
            .collect()
    };

    let openapi_changed = select(Label::Openapi);
    let sdk_changed = select(Label::Sdk);
    let reference_docs_changed = select(Label::ReferenceDoc);

    let (status, summary) = if openapi_changed.is_empty() && sdk_changed.is_empty() {
        (DriftStatus::Ok, "No API/SDK signature changes detected.".to_string())
    } else if reference_docs_changed.is_empty() {
        (
            DriftStatus::Drift,
            "API/SDK changes detected without reference documentation updates.".to_string(),
        )
    } else {
        (DriftStatus::Ok, "API/SDK changes are accompanied by reference docs updates.".to_string())
    };

    DriftReport { status, summary, openapi_changed, sdk_changed, reference_docs_changed }
}
