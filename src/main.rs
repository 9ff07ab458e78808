//! Binary entrypoint for the `docgov` CLI.

use std::process::ExitCode;

use docgov::Outcome;

fn main() -> ExitCode {
    // Optional .env with e.g. DOCGOV_COMMUNITY_FEED for gap analysis.
    dotenvy::dotenv().ok();

    match docgov::run(std::env::args()) {
        Ok(Outcome::Clean) => ExitCode::SUCCESS,
        Ok(Outcome::Flagged) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}
