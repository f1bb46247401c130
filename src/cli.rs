use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Presage linear predictive filter toolkit.
#[derive(Parser)]
#[command(
    name = "presage",
    version,
    about = "Linear predictive filter for real-time adaptive control"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Build the regression design matrix from a telemetry capture.
    Build(BuildArgs),
    /// Replay a telemetry capture through a predictive filter.
    Apply(ApplyArgs),
}

/// Arguments for the `build` subcommand.
#[derive(clap::Args)]
pub struct BuildArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "presage.toml")]
    pub config: PathBuf,

    /// Override telemetry capture CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override design matrix output CSV path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the paired target matrix to this CSV path.
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Override filter order from config.
    #[arg(long)]
    pub order: Option<usize>,

    /// Override latency (frames, fractional) from config.
    #[arg(long)]
    pub latency: Option<f32>,
}

/// Arguments for the `apply` subcommand.
#[derive(clap::Args)]
pub struct ApplyArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "presage.toml")]
    pub config: PathBuf,

    /// Override telemetry capture CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override filter matrix CSV path from config.
    #[arg(short, long)]
    pub matrix: Option<PathBuf>,

    /// Override predictions output CSV path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
