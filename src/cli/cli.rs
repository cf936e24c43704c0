use std::path::PathBuf;

use clap::Parser;

use crate::cli::LogLevel;

/// Runs the tests listed in `litter.yaml` and fails those that leave files behind.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Tests to run. Runs every test when none are given
    pub tests: Vec<String>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The directory checked for litter, also holding litter.yaml
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Scratch directory tests may write to freely, relative to the root
    #[clap(long)]
    pub basetemp: Option<PathBuf>,
}
