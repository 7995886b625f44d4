//! Command-line interface for the shelter-gap analysis engine.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod analyse;
mod error;
mod report;

pub use error::CliError;

use analyse::{AnalyseArgs, run_analyse};

pub(crate) const ARG_SHELTERS: &str = "shelters";
pub(crate) const ARG_DEMAND: &str = "demand";
pub(crate) const ARG_GEOCODE_CACHE: &str = "geocode-cache";
pub(crate) const ARG_OUTPUT_DIR: &str = "output-dir";
pub(crate) const ARG_CLUSTERS: &str = "clusters";
pub(crate) const ARG_MAX_RADIUS_KM: &str = "max-radius-km";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_PRIORITY_THRESHOLDS: &str = "priority-thresholds";
pub(crate) const ARG_DEFAULT_WEIGHT: &str = "default-weight";
pub(crate) const ARG_WEIGHT_MULTIPLIER: &str = "weight-multiplier";
pub(crate) const ARG_CITY_SUFFIX: &str = "city-suffix";
pub(crate) const ENV_SHELTERS: &str = "SHELTER_GAP_CMDS_ANALYSE_SHELTERS";
pub(crate) const ENV_DEMAND: &str = "SHELTER_GAP_CMDS_ANALYSE_DEMAND";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    match cli.command {
        Command::Analyse(args) => run_analyse(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "shelter-gap",
    about = "Find gaps between unsheltered demand and shelter capacity",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Cluster demand, score shelter gaps and write the served snapshot.
    Analyse(AnalyseArgs),
}

#[cfg(test)]
mod tests;
