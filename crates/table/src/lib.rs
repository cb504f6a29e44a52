//! # snowcast-table
//!
//! Canonical in-memory representation of multi-model ensemble forecasts.
//!
//! An [`EnsembleTable`] is a regular time axis plus a set of value series,
//! each addressed by a structured [`SeriesKey`] of `(model, variable,
//! member)`. Variables come from a fixed vocabulary ([`Quantity`] plus an
//! optional daily [`Aggregation`]), so `precipitation` and
//! `precipitation_sum` are distinct keys rather than overlapping strings.
//!
//! Missing values are stored as NaN inside a [`Series`] and surface as
//! `None` through its accessors. Reductions in downstream crates drop them
//! without dropping the timestamp row.
//!
//! The table is built once per request at the data boundary and then read
//! by the engines; nothing downstream mutates it except to append derived
//! series.

mod error;
mod key;
mod series;
mod table;
mod validate;
mod variable;

pub use error::TableError;
pub use key::{Origin, SeriesKey};
pub use series::Series;
pub use table::{EnsembleTable, Interval};
pub use variable::{Aggregation, Quantity, Variable};
