//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "rerank-parity",
    version,
    about = "Compare a served reranker against a reference cross-encoder"
)]
pub struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the served (HTTP) backend over all fixtures.
    Served,
    /// Run the reference (in-process) backend over all fixtures.
    Reference,
    /// Compare both backends, running whichever has no results yet.
    Compare(CompareArgs),
    /// Print the effective configuration.
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Directory holding `test_*.json` fixtures (overrides PARITY_FIXTURES_DIR).
    #[arg(long, global = true)]
    pub fixtures_dir: Option<PathBuf>,

    /// Directory for result files (overrides PARITY_RESULTS_DIR).
    #[arg(long, global = true)]
    pub results_dir: Option<PathBuf>,
}

impl PathArgs {
    /// Applies the flags on top of an environment-loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.fixtures_dir {
            config.fixtures_dir = dir.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = dir.clone();
        }
        config
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompareArgs {
    /// Re-run both backends even if result files exist.
    #[arg(long, default_value_t = false)]
    pub rerun: bool,
}
