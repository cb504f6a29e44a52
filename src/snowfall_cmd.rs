//! Snowfall command: one evaluation of the snow model with every stage shown.

use anyhow::{Context, Result};

use snowcast_snow::{SnowParams, snowfall_breakdown};

use crate::cli::SnowfallArgs;
use crate::config::SnowcastConfig;
use crate::convert;

pub fn run(args: SnowfallArgs) -> Result<()> {
    let params = match &args.config {
        Some(path) => {
            let toml_str = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            let config: SnowcastConfig =
                toml::from_str(&toml_str).context("failed to parse TOML config")?;
            convert::build_snow_params(&config.snow)
        }
        None => SnowParams::default(),
    };
    params.validate().context("invalid snow parameters")?;

    let b = snowfall_breakdown(
        args.temperature,
        args.humidity,
        args.precipitation,
        args.duration,
        &params,
    );
    println!("wet-bulb temperature: {:.2} °C", b.wet_bulb_c);
    println!("snow probability:     {:.3}", b.snow_probability);
    println!("base SLR:             {:.2}", b.base_slr);
    println!("humidity factor:      {:.3}", b.humidity_factor);
    println!("rate factor:          {:.3}", b.rate_factor);
    println!("effective SLR:        {:.2}", b.effective_slr);
    println!("snowfall:             {:.1} cm", b.snowfall_cm);
    Ok(())
}
