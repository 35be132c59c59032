use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Flood hazard index backtesting against historical disaster records.
#[derive(Parser)]
#[command(
    name = "hmhews",
    version,
    about = "Backtest a flood hazard index against DIBI disaster records"
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
    /// Score the hazard index at one threshold.
    Backtest(BacktestArgs),
    /// Score the hazard index over a list of thresholds.
    Sweep(SweepArgs),
    /// Link boundary regions to disaster-database regions and report coverage.
    Resolve(ResolveArgs),
}

/// Arguments for the `backtest` subcommand.
#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hmhews.toml")]
    pub config: PathBuf,

    /// Write the JSON report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override `[backtest].hazard_threshold`, on the configured scale.
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for the `sweep` subcommand.
#[derive(clap::Args)]
pub struct SweepArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hmhews.toml")]
    pub config: PathBuf,

    /// Write the JSON report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Thresholds on the configured scale; tenths of the scale when omitted.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub thresholds: Vec<f64>,
}

/// Arguments for the `resolve` subcommand.
#[derive(clap::Args)]
pub struct ResolveArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "hmhews.toml")]
    pub config: PathBuf,

    /// Write an override stub listing every unresolved region.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Write the full identity table as JSON.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
