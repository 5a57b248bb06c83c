//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, materials::MaterialsArgs, report::ReportArgs,
    weights::WeightsArgs,
};

#[derive(Parser)]
#[command(name = "stk")]
#[command(author, version, about = "Steel Takeoff Toolkit")]
#[command(long_about = "Merge takeoff geometry and cost-by-type exports into a priced bill of materials with estimated drop weight.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Extra config file, applied over ~/.config/stk/config.yaml and ./.stk.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pricing report with spreadsheet formulas
    Report(ReportArgs),

    /// Weight list: pieces grouped by rounded length
    Weights(WeightsArgs),

    /// Material rollup with stock bars and drop weight
    Materials(MaterialsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-oriented default for each command
    #[default]
    Auto,
    /// Tab-separated values (for spreadsheets)
    Tsv,
    /// JSON format (for programming)
    Json,
}
