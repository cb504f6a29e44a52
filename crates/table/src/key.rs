//! Structured series addressing.

use std::fmt;

use serde::Serialize;

use crate::variable::Variable;

/// Address of one series in an [`EnsembleTable`](crate::EnsembleTable).
///
/// Ordering is `(model, variable, member)`, so iterating a table visits
/// every member of one model and variable contiguously.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SeriesKey {
    model: String,
    variable: Variable,
    member: u32,
}

impl SeriesKey {
    /// Creates a key for `member` of `model` reporting `variable`.
    pub fn new(model: impl Into<String>, variable: impl Into<Variable>, member: u32) -> Self {
        Self {
            model: model.into(),
            variable: variable.into(),
            member,
        }
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the variable.
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// Returns the member index (unique per model and variable).
    pub fn member(&self) -> u32 {
        self.member
    }

    /// Same model and member, different variable.
    pub fn with_variable(&self, variable: impl Into<Variable>) -> Self {
        Self {
            model: self.model.clone(),
            variable: variable.into(),
            member: self.member,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/member{}", self.model, self.variable, self.member)
    }
}

/// Provenance of a series.
///
/// Daily tables from some providers carry one pre-aggregated series per
/// model instead of genuine ensemble members; those are tagged
/// [`Origin::Aggregate`] so spread statistics can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A genuine ensemble member.
    #[default]
    Member,
    /// A per-model aggregate with no ensemble spread.
    Aggregate,
}
