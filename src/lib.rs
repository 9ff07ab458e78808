//! Core library entry for the `docgov` CLI.

pub mod adapters;
pub mod changeset;
pub mod cli;
pub mod commands;
pub mod context;
pub mod contract;
pub mod drift;
pub mod error;
pub mod frontmatter;
pub mod gaps;
pub mod kpi;
pub mod policy;
pub mod ports;
pub mod report;

use clap::Parser;

pub use commands::Outcome;
pub use error::GovernanceError;

/// Run the CLI with the provided arguments against live adapters.
///
/// # Errors
///
/// Returns a `GovernanceError` when argument parsing fails or the
/// selected command fails fatally. Gate violations and SLA breaches
/// are reported through [`Outcome::Flagged`], not through errors.
pub fn run<I, T>(args: I) -> Result<Outcome, GovernanceError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            print!("{err}");
            return Ok(Outcome::Clean);
        }
        Err(err) => return Err(GovernanceError::Usage(err.to_string())),
    };

    let ctx = context::ServiceContext::live();
    commands::dispatch(&cli.command, &ctx)
}
