//! # snowcast-snow
//!
//! Physically motivated snowfall estimation from temperature, relative
//! humidity and liquid-equivalent precipitation.
//!
//! # Model
//!
//! 1. **Wet-bulb temperature** from T and RH (Stull closed form)
//! 2. **Snow probability**, a logistic in wet-bulb temperature
//! 3. **Base SLR**, a Gaussian in air temperature between `r_min` and `r_max`
//! 4. **Humidity factor** in `[0.8, 1.2]`
//! 5. **Rate factor** `1 / (1 + delta * mm_per_h)`, when a duration is known
//! 6. **Depth** `max(0, P * SLR * p_snow / 10)` in cm
//!
//! The same scalar formula backs [`calculate_snowfall`],
//! [`snowfall_series`], and the table-level [`compute_snowfall`].

mod config;
mod derive;
mod error;
mod formulas;

pub use config::SnowParams;
pub use derive::{SNOWFALL_CALCULATED, append_snowfall, compute_snowfall, snowfall_series};
pub use error::SnowError;
pub use formulas::{
    SnowBreakdown, base_slr, calculate_snowfall, humidity_factor, rate_factor,
    snow_probability, snowfall_breakdown, wet_bulb_temperature,
};
