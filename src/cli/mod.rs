//! Command-line parsing for the Neyman belt tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the simulation/minimization code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::minimize::MinimizerKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "neyman", version, about = "Monte-Carlo Neyman belt construction and 1-D minimization")]
pub struct Cli {
    /// Log level when `RUST_LOG` is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Shorthand for `--log-level info`.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a belt, slice it at the observed value, and write the artifacts.
    Belt(BeltArgs),
    /// Minimize exp(-x^2)*sin(x) and check the result against a threshold.
    Minimize(MinimizeArgs),
}

/// Options for belt construction.
#[derive(Debug, Args, Clone)]
pub struct BeltArgs {
    /// Build the belt for a Gaussian mean (default).
    #[arg(long, conflicts_with = "exp")]
    pub gaus: bool,

    /// Build the belt for an exponential rate parameter.
    #[arg(long)]
    pub exp: bool,

    /// Number of measurements per simulated experiment.
    #[arg(long, default_value_t = 1)]
    pub meas: usize,

    /// Observed value at which the 1-D slice is taken.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub slice: f64,

    /// Simulated experiments per true-parameter grid point.
    #[arg(long, default_value_t = 100_000)]
    pub experiments: usize,

    /// Master seed (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use a single PRNG stream and no worker threads.
    #[arg(long)]
    pub sequential: bool,

    /// Collapse out-of-range estimates into the edge bins instead of dropping them.
    #[arg(long)]
    pub clip: bool,

    /// Confidence level of the interval read off the slice.
    #[arg(long, default_value_t = 0.6827)]
    pub cl: f64,

    /// Directory for the SVG artifacts.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Skip the SVG artifacts.
    #[arg(long)]
    pub no_svg: bool,

    /// Skip the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Terminal plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Terminal plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write `belt.csv` and `slice.csv` into this directory.
    #[arg(long = "export-csv", value_name = "DIR")]
    pub export_csv: Option<PathBuf>,

    /// Write a JSON run summary.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for the minimization check.
#[derive(Debug, Args, Clone)]
pub struct MinimizeArgs {
    /// Minimization backend.
    #[arg(long, value_enum, default_value_t = MinimizerKind::QuasiNewton)]
    pub algorithm: MinimizerKind,

    /// Starting point.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start: f64,

    /// Draw the starting point uniformly from [-20, 20) with this seed.
    #[arg(long, value_name = "SEED", conflicts_with = "start")]
    pub random_start: Option<u64>,

    /// Initial step.
    #[arg(long, default_value_t = 0.01, allow_negative_numbers = true)]
    pub step: f64,

    #[arg(long, default_value_t = 10_000)]
    pub max_iterations: usize,

    #[arg(long = "max-calls", default_value_t = 1_000_000)]
    pub max_function_calls: usize,

    /// Stopping tolerance on the estimated distance to the minimum.
    #[arg(long, default_value_t = 0.001)]
    pub tolerance: f64,

    /// Both the reported and re-evaluated minimum must be below this value.
    #[arg(long, default_value_t = 1e-4, allow_negative_numbers = true)]
    pub threshold: f64,
}
