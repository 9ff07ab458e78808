//! Policy pack loading and validation.
//!
//! A policy pack is a YAML bundle of file-pattern groups and numeric
//! thresholds that parameterizes every governance check for one
//! repository/team profile. Packs are validated eagerly: an empty
//! pattern list silently disables a gate, so it is rejected at load
//! time rather than at evaluation time.

use std::path::Path;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::ports::filesystem::FileSystem;

/// Path matching is case-insensitive, mirroring how interface paths
/// show up across platforms (`Docs/` vs `docs/`).
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A named list of glob patterns compiled at load time.
#[derive(Debug, Clone)]
pub struct PatternGroup {
    raw: Vec<String>,
    compiled: Vec<Pattern>,
}

impl PatternGroup {
    /// Compiles a pattern list, rejecting empty lists and invalid globs.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the offending group and pattern.
    pub fn compile(group: &str, raw: Vec<String>) -> Result<Self, GovernanceError> {
        if raw.is_empty() {
            return Err(GovernanceError::Config(format!(
                "{group} must be a non-empty list of glob patterns"
            )));
        }
        let mut compiled = Vec::with_capacity(raw.len());
        for pattern in &raw {
            let glob = Pattern::new(pattern).map_err(|e| {
                GovernanceError::Config(format!("{group} has invalid glob `{pattern}`: {e}"))
            })?;
            compiled.push(glob);
        }
        Ok(Self { raw, compiled })
    }

    /// Returns `true` if any pattern in the group matches the path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.compiled.iter().any(|p| p.matches_with(path, MATCH_OPTIONS))
    }

    /// The original pattern strings, for report output.
    #[must_use]
    pub fn raw(&self) -> &[String] {
        &self.raw
    }
}

/// SLA thresholds from the `kpi_sla` section.
///
/// All keys are required: a pack that omits one would silently skip a
/// check, which is the operator mistake eager validation exists to
/// catch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlaThresholds {
    /// Minimum acceptable quality score (0-100).
    pub min_quality_score: i64,
    /// Maximum acceptable percentage of stale docs.
    pub max_stale_pct: f64,
    /// Maximum acceptable count of open high-priority gaps.
    pub max_high_priority_gaps: i64,
    /// Maximum acceptable quality-score drop versus the previous snapshot.
    pub max_quality_score_drop: i64,
}

/// Raw YAML shape of a policy pack file.
#[derive(Debug, Deserialize)]
struct RawPolicyPack {
    docs_contract: RawContractSection,
    drift: RawDriftSection,
    kpi_sla: SlaThresholds,
}

#[derive(Debug, Deserialize)]
struct RawContractSection {
    interface_patterns: Vec<String>,
    doc_patterns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDriftSection {
    openapi_patterns: Vec<String>,
    sdk_patterns: Vec<String>,
    reference_doc_patterns: Vec<String>,
}

/// A validated, immutable policy pack.
#[derive(Debug, Clone)]
pub struct PolicyPack {
    /// Where the pack was loaded from; identifies the profile in reports.
    pub name: String,
    /// Patterns marking public interface surface.
    pub interface_patterns: PatternGroup,
    /// Patterns marking documentation files.
    pub doc_patterns: PatternGroup,
    /// Patterns marking OpenAPI/Swagger specs.
    pub openapi_patterns: PatternGroup,
    /// Patterns marking SDK/client code.
    pub sdk_patterns: PatternGroup,
    /// Patterns marking reference documentation.
    pub reference_doc_patterns: PatternGroup,
    /// SLA thresholds for the KPI evaluator.
    pub sla: SlaThresholds,
}

impl PolicyPack {
    /// Loads and validates a policy pack from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the file is absent, unparsable,
    /// missing a required key, or contains an empty or invalid pattern
    /// list.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, GovernanceError> {
        let contents = fs.read_to_string(path).map_err(|e| {
            GovernanceError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let raw: RawPolicyPack = serde_yaml::from_str(&contents).map_err(|e| {
            GovernanceError::Config(format!("cannot parse {}: {e}", path.display()))
        })?;

        Ok(Self {
            name: path.display().to_string(),
            interface_patterns: PatternGroup::compile(
                "docs_contract.interface_patterns",
                raw.docs_contract.interface_patterns,
            )?,
            doc_patterns: PatternGroup::compile(
                "docs_contract.doc_patterns",
                raw.docs_contract.doc_patterns,
            )?,
            openapi_patterns: PatternGroup::compile(
                "drift.openapi_patterns",
                raw.drift.openapi_patterns,
            )?,
            sdk_patterns: PatternGroup::compile("drift.sdk_patterns", raw.drift.sdk_patterns)?,
            reference_doc_patterns: PatternGroup::compile(
                "drift.reference_doc_patterns",
                raw.drift.reference_doc_patterns,
            )?,
            sla: raw.kpi_sla,
        })
    }
}

/// YAML for a representative pack, shared across module tests.
#[cfg(test)]
pub(crate) const SAMPLE_PACK_YAML: &str = "\
docs_contract:
  interface_patterns:
    - \"api/**\"
    - \"*openapi*.yaml\"
    - \"sdk/**\"
  doc_patterns:
    - \"docs/**\"
    - \"templates/**\"
drift:
  openapi_patterns:
    - \"*openapi*.yaml\"
    - \"*swagger*.json\"
  sdk_patterns:
    - \"sdk/**\"
    - \"clients/**\"
  reference_doc_patterns:
    - \"docs/reference/**\"
kpi_sla:
  min_quality_score: 80
  max_stale_pct: 15.0
  max_high_priority_gaps: 8
  max_quality_score_drop: 5
";

/// Loads [`SAMPLE_PACK_YAML`] through an in-memory filesystem.
#[cfg(test)]
pub(crate) fn sample_pack() -> PolicyPack {
    use crate::context::test_support::MemFs;
    let fs = MemFs::new().seed("pack.yaml", SAMPLE_PACK_YAML);
    PolicyPack::load(&fs, Path::new("pack.yaml")).expect("sample pack is valid")
}
