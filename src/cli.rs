use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Snowcast ensemble snow forecaster.
#[derive(Parser)]
#[command(
    name = "snowcast",
    version,
    about = "Multi-model ensemble snow forecasts for mountain locations"
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
    /// Assemble a forecast from ensemble tables.
    Forecast(ForecastArgs),
    /// Evaluate the snow model for a single set of conditions.
    Snowfall(SnowfallArgs),
}

/// Arguments for the `forecast` subcommand.
#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "snowcast.toml")]
    pub config: PathBuf,

    /// Path to the hourly ensemble table (JSON).
    #[arg(long)]
    pub hourly: PathBuf,

    /// Path to the daily ensemble table (JSON).
    #[arg(long)]
    pub daily: Option<PathBuf>,

    /// Path for the forecast JSON. Written to stdout if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `snowfall` subcommand.
#[derive(clap::Args)]
pub struct SnowfallArgs {
    /// Air temperature (°C).
    #[arg(long = "temp", allow_hyphen_values = true)]
    pub temperature: f64,

    /// Relative humidity (%).
    #[arg(long = "rh")]
    pub humidity: f64,

    /// Liquid-equivalent precipitation (mm).
    #[arg(long = "precip")]
    pub precipitation: f64,

    /// Accumulation period (h). Enables the rate adjustment.
    #[arg(long)]
    pub duration: Option<f64>,

    /// TOML configuration whose `[snow]` section overrides the defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
