//! Fixed variable vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// A physical quantity reported by an ensemble model (or derived from one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantity {
    /// Air temperature at 2 m (°C).
    Temperature2m,
    /// Relative humidity at 2 m (%).
    RelativeHumidity2m,
    /// Dew point at 2 m (°C).
    DewPoint2m,
    /// Liquid-equivalent precipitation (mm).
    Precipitation,
    /// Model-reported snowfall (cm).
    Snowfall,
    /// Snowfall derived by the snow physics engine (cm).
    SnowfallCalculated,
    /// Wind speed at 80 m (km/h).
    WindSpeed80m,
    /// Wind direction at 80 m (degrees).
    WindDirection80m,
    /// Wind speed at 10 m (km/h).
    WindSpeed10m,
    /// Wind direction at 10 m (degrees).
    WindDirection10m,
    /// Wind gusts at 10 m (km/h).
    WindGusts10m,
    /// Height of the 0 °C isotherm (m).
    FreezingLevelHeight,
    /// Temperature at the 850 hPa level (°C).
    Temperature850hPa,
    /// Total cloud cover (%).
    CloudCover,
    /// Surface pressure (hPa).
    SurfacePressure,
}

impl Quantity {
    /// Every quantity in the vocabulary.
    pub const ALL: [Quantity; 15] = [
        Quantity::Temperature2m,
        Quantity::RelativeHumidity2m,
        Quantity::DewPoint2m,
        Quantity::Precipitation,
        Quantity::Snowfall,
        Quantity::SnowfallCalculated,
        Quantity::WindSpeed80m,
        Quantity::WindDirection80m,
        Quantity::WindSpeed10m,
        Quantity::WindDirection10m,
        Quantity::WindGusts10m,
        Quantity::FreezingLevelHeight,
        Quantity::Temperature850hPa,
        Quantity::CloudCover,
        Quantity::SurfacePressure,
    ];

    /// Canonical provider name, e.g. `"temperature_2m"`.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Temperature2m => "temperature_2m",
            Quantity::RelativeHumidity2m => "relative_humidity_2m",
            Quantity::DewPoint2m => "dew_point_2m",
            Quantity::Precipitation => "precipitation",
            Quantity::Snowfall => "snowfall",
            Quantity::SnowfallCalculated => "snowfall_calculated",
            Quantity::WindSpeed80m => "wind_speed_80m",
            Quantity::WindDirection80m => "wind_direction_80m",
            Quantity::WindSpeed10m => "wind_speed_10m",
            Quantity::WindDirection10m => "wind_direction_10m",
            Quantity::WindGusts10m => "wind_gusts_10m",
            Quantity::FreezingLevelHeight => "freezing_level_height",
            Quantity::Temperature850hPa => "temperature_850hPa",
            Quantity::CloudCover => "cloud_cover",
            Quantity::SurfacePressure => "surface_pressure",
        }
    }

    /// Looks up a quantity by its exact canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.name() == name)
    }
}

/// Daily aggregation applied to an hourly quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Aggregation {
    Min,
    Max,
    Mean,
    Sum,
    Dominant,
}

impl Aggregation {
    /// Every aggregation kind.
    pub const ALL: [Aggregation; 5] = [
        Aggregation::Min,
        Aggregation::Max,
        Aggregation::Mean,
        Aggregation::Sum,
        Aggregation::Dominant,
    ];

    /// Name suffix used in provider variable names.
    pub fn suffix(self) -> &'static str {
        match self {
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Mean => "mean",
            Aggregation::Sum => "sum",
            Aggregation::Dominant => "dominant",
        }
    }
}

/// A variable: a quantity, optionally aggregated to daily resolution.
///
/// Parsing matches whole names only. `"precipitation"` and
/// `"precipitation_sum"` parse to different variables, and an unknown name
/// is an error rather than a substring match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Variable {
    quantity: Quantity,
    aggregation: Option<Aggregation>,
}

impl Variable {
    /// A plain (instantaneous or hourly-accumulated) variable.
    pub const fn new(quantity: Quantity) -> Self {
        Self {
            quantity,
            aggregation: None,
        }
    }

    /// A daily-aggregated variable.
    pub const fn aggregated(quantity: Quantity, aggregation: Aggregation) -> Self {
        Self {
            quantity,
            aggregation: Some(aggregation),
        }
    }

    /// Returns the underlying quantity.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the daily aggregation, if any.
    pub fn aggregation(&self) -> Option<Aggregation> {
        self.aggregation
    }

    /// Returns `true` for daily-aggregated variants.
    pub fn is_aggregated(&self) -> bool {
        self.aggregation.is_some()
    }
}

impl From<Quantity> for Variable {
    fn from(quantity: Quantity) -> Self {
        Variable::new(quantity)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.aggregation {
            Some(agg) => write!(f, "{}_{}", self.quantity.name(), agg.suffix()),
            None => f.write_str(self.quantity.name()),
        }
    }
}

impl FromStr for Variable {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(q) = Quantity::from_name(s) {
            return Ok(Variable::new(q));
        }
        for agg in Aggregation::ALL {
            if let Some(base) = s.strip_suffix(agg.suffix()).and_then(|b| b.strip_suffix('_'))
                && let Some(q) = Quantity::from_name(base)
            {
                return Ok(Variable::aggregated(q, agg));
            }
        }
        Err(TableError::UnknownVariable {
            name: s.to_string(),
        })
    }
}

impl From<Variable> for String {
    fn from(v: Variable) -> Self {
        v.to_string()
    }
}

impl TryFrom<String> for Variable {
    type Error = TableError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
