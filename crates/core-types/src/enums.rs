use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the value column of a source is scaled on ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPolicy {
    /// The column already holds decimal fractions (0.0016 for 16 bp).
    #[default]
    Fraction,
    /// The column is percent-scaled and is divided by 100 (risk-free feeds).
    Percent,
}

impl UnitPolicy {
    /// Applies the policy to a sanitized value.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            UnitPolicy::Fraction => value,
            UnitPolicy::Percent => value / 100.0,
        }
    }
}

/// The sign of a populated table cell. `Empty` is never a zero month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellTone {
    Positive,
    Negative,
    Flat,
    Empty,
}

/// A dashboard cell that may still be waiting on its inputs.
///
/// Replaces string sentinels such as `"Loading Returns..."` so a pending value
/// can never be formatted as a number by mistake.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Metric {
    Loading,
    Value(Decimal),
    Unavailable(String),
}

impl Metric {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Metric::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Loading => write!(f, "Loading..."),
            Metric::Value(v) => write!(f, "{}", v),
            Metric::Unavailable(_) => write!(f, "N/A"),
        }
    }
}
