//! Command-line interface for scoring SA2 regions.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod input;
mod output;
mod score;

pub use error::CliError;
pub use output::OutputFormat;

use score::{ScoreArgs, run_score};

pub(crate) const ARG_SCORE_BUNDLE: &str = "bundle";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_FORMAT: &str = "format";
pub(crate) const ARG_MIN_POPULATION: &str = "min-population";
pub(crate) const ARG_ZONES: &str = "zones";
pub(crate) const ENV_SCORE_BUNDLE: &str = "SA2_CMDS_SCORE_BUNDLE";

/// Run the SA2 CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sa2",
    about = "Score SA2 regions on access to businesses, transit, schools and amenities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank the regions in an input bundle.
    Score(ScoreArgs),
}

#[cfg(test)]
mod tests;
