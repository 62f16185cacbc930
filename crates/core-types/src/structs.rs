use crate::enums::CellTone;
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Lower-case month keys used by the year×month grid.
pub const MONTH_LABELS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// One admitted row of a daily return series.
///
/// `value` is always a finite decimal fraction (0.0016 == 16 bp).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub value: f64,
}

impl DailyObservation {
    pub fn new(date: NaiveDate, value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() {
            return Err(CoreError::NonFiniteValue { date, value });
        }
        Ok(Self { date, value })
    }

    /// The `YYYY-MM` key this observation compounds into.
    pub fn period(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// An immutable daily series, kept in source row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    observations: Vec<DailyObservation>,
}

impl ReturnSeries {
    pub fn new(observations: Vec<DailyObservation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[DailyObservation] {
        &self.observations
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest date in the series. Rows are not assumed to be sorted.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).min()
    }

    /// Arithmetic mean of the values, `0.0` for an empty series.
    pub fn mean(&self) -> f64 {
        if self.observations.is_empty() {
            return 0.0;
        }
        self.observations.iter().map(|o| o.value).sum::<f64>() / self.observations.len() as f64
    }
}

/// A compounded calendar-month return, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// `YYYY-MM`
    pub period: String,
    #[serde(rename = "return")]
    pub return_pct: f64,
}

impl MonthlyReturn {
    pub fn new(period: impl Into<String>, return_pct: f64) -> Self {
        Self {
            period: period.into(),
            return_pct,
        }
    }

    pub fn year(&self) -> &str {
        self.period.split('-').next().unwrap_or_default()
    }

    /// Zero-based month index, `None` when the period has no valid month part.
    pub fn month_index(&self) -> Option<usize> {
        let month: usize = self.period.split('-').nth(1)?.parse().ok()?;
        (1..=12).contains(&month).then(|| month - 1)
    }
}

/// One year of the performance grid. Cells are `"1.23%"` or empty.
///
/// Serializes flat as `{ year, jan, ..., dec, total }`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub year: String,
    pub months: [String; 12],
    pub total: String,
}

impl TableRow {
    pub fn new(year: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            months: Default::default(),
            total: String::new(),
        }
    }

    /// Sign of a month cell. Empty cells report `CellTone::Empty`, never `Flat`.
    pub fn tone(&self, month_index: usize) -> CellTone {
        self.months
            .get(month_index)
            .map(|cell| tone_of(cell))
            .unwrap_or(CellTone::Empty)
    }

    pub fn total_tone(&self) -> CellTone {
        tone_of(&self.total)
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("TableRow", MONTH_LABELS.len() + 2)?;
        row.serialize_field("year", &self.year)?;
        for (label, cell) in MONTH_LABELS.iter().zip(&self.months) {
            row.serialize_field(*label, cell)?;
        }
        row.serialize_field("total", &self.total)?;
        row.end()
    }
}

fn tone_of(cell: &str) -> CellTone {
    if cell.is_empty() {
        return CellTone::Empty;
    }
    match cell.trim_end_matches('%').parse::<f64>() {
        Ok(v) if v > 0.0 => CellTone::Positive,
        Ok(v) if v < 0.0 => CellTone::Negative,
        Ok(_) => CellTone::Flat,
        Err(_) => CellTone::Empty,
    }
}
