//! # snowcast-ensemble
//!
//! Reductions over an [`EnsembleTable`](snowcast_table::EnsembleTable):
//!
//! - **Statistics**: min/max/mean/median/std and type-7 percentiles across
//!   members at every timestamp, plus a windowed [`Trend`] classifier
//! - **Probability**: empirical fraction of members meeting a predicate,
//!   with named thresholds held in one [`ProbabilityThresholds`] object
//! - **Agreement**: per-model means compared across models, with spread,
//!   coefficient of variation and z-score outliers
//! - **Aggregation**: weighted multi-model mean, consensus forecast,
//!   condition-based model selection and tail (extreme value) statistics
//! - **Quality**: completeness, spread and member coherence
//!
//! Missing values never count as zero. A timestamp where no member has a
//! value yields `None`, and asking for a variable absent from the table is
//! an [`EnsembleError::NoSuchVariable`].

mod aggregate;
mod agreement;
mod config;
mod error;
mod probability;
mod quality;
mod statistics;
mod trend;

pub use aggregate::{
    ExtremeValues, ModelSelection, ModelWeights, PreferredModel, consensus, extreme_values,
    select_by_conditions, weighted_model_mean,
};
pub use agreement::{
    AgreementLevel, AgreementSnapshot, ModelComparison, ModelDeviation, ModelMeans, ModelSpread,
    compare_models, identify_outliers, model_means,
};
pub use config::{AgreementConfig, ProbabilityThresholds, Tiers};
pub use error::EnsembleError;
pub use probability::{
    PrecipitationProbabilities, SnowProbabilities, TemperatureProbabilities, Threshold,
    WindProbabilities, fraction, precipitation_probabilities, probability, snow_probabilities,
    temperature_probabilities, wind_probabilities,
};
pub use quality::{QualityReport, assess_quality};
pub use statistics::{EnsembleStats, Percentiles, calculate_statistics, summarize};
pub use trend::{DEFAULT_TREND_WINDOW, Trend, calculate_trend, classify_rate};
