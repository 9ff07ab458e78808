//! Error taxonomy for governance checks.

/// Fatal errors that abort the invoking command with exit code 2.
///
/// Threshold breaches, contract violations, and drift are normal
/// outcomes communicated through report statuses and exit code 1,
/// never through this type.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    /// Policy pack missing, unparsable, or failing validation.
    #[error("policy pack error: {0}")]
    Config(String),

    /// A revision reference could not be resolved by git.
    #[error("diff error: {0}")]
    Diff(String),

    /// An input file (KPI snapshot, Algolia export) could not be read or parsed.
    #[error("input error: {0}")]
    Input(String),

    /// A report artifact could not be written.
    #[error("report error: {0}")]
    Report(String),

    /// Argument parsing failed.
    #[error("{0}")]
    Usage(String),
}

/// A gap-signal source that could not be collected.
///
/// Non-fatal: the aggregator degrades the source's contribution to an
/// empty list and records the failure as a report caveat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFailure {
    /// Name of the failing collector (`code`, `community`, `staleness`, `search`).
    pub collector: &'static str,
    /// One-line cause.
    pub cause: String,
}

impl std::fmt::Display for CollectionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} collector failed: {}", self.collector, self.cause)
    }
}
