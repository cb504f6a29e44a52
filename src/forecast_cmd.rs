//! Forecast command: ensemble tables in, forecast JSON out.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use snowcast_forecast::{assemble_forecast, to_json};

use crate::cli::ForecastArgs;
use crate::config::SnowcastConfig;
use crate::{convert, input};

/// Run the forecast pipeline.
pub fn run(args: ForecastArgs) -> Result<()> {
    let _cmd = info_span!("forecast").entered();
    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: SnowcastConfig =
        toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let location = config
        .location
        .as_ref()
        .map(convert::build_location)
        .ok_or_else(|| anyhow::anyhow!("no location: add a [location] section to the config"))?;
    let forecast_cfg = convert::build_forecast_config(&config)?;

    // 2. Read tables
    let hourly = input::read_table(&args.hourly)?;
    let daily = args
        .daily
        .as_deref()
        .map(input::read_table)
        .transpose()?;

    // 3. Assemble
    info!(location = %location.name, "assembling forecast");
    let forecast = assemble_forecast(hourly, daily.as_ref(), &location, &forecast_cfg)
        .context("forecast assembly failed")?;
    let json = to_json(&forecast)?;

    // 4. Write
    match args.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("failed to write forecast: {}", path.display()))?;
            info!(path = %path.display(), "forecast written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
