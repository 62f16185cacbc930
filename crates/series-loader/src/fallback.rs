use crate::error::LoaderError;
use crate::parser::{DateLayout, parse_date};
use core_types::{DailyObservation, ReturnSeries, sanitize};

/// Sample statement used when no configured source can be read, so the
/// downstream statistics always have something to work with.
pub const INLINE_FALLBACK_CSV: &str = "\
Date,Start Balance,Gain / Loss,End Balance ,Basis Points ,Daily Gain / Loss
2024-01-10,3'000'000.00,-0.05,2'999'999.95,-0,-0.00%
2024-01-11,2'999'999.95,1.08,3'000'001.03,0,0.00%
2024-01-12,3'000'001.03,0.48,3'000'001.51,0,0.00%
2024-01-16,3'000'001.51,4'668.21,3'004'669.72,16,0.16%
2024-01-17,3'004'669.72,126.28,3'004'796.00,0,0.00%";

const BASIS_POINTS_PER_UNIT: f64 = 10_000.0;

/// The inline sample as a decimal-fraction series.
pub fn fallback_series() -> ReturnSeries {
    match parse_statement(INLINE_FALLBACK_CSV) {
        Ok(series) => series,
        Err(e) => {
            tracing::error!(error = %e, "Inline fallback data could not be parsed.");
            ReturnSeries::default()
        }
    }
}

/// Parses a balance statement with named columns.
///
/// `Basis Points` is the primary value; `Daily Gain / Loss` (percent) is used
/// only when the basis-point cell is unparseable. Values are converted from
/// basis points to decimal fractions here, once.
pub fn parse_statement(text: &str) -> Result<ReturnSeries, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let date_col = column("Date");
    let bp_col = column("Basis Points");
    let pct_col = column("Daily Gain / Loss");

    let mut observations = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i));

        let Some((date, DateLayout::Iso)) = cell(date_col).and_then(parse_date) else {
            continue;
        };
        let basis_points = cell(bp_col)
            .and_then(sanitize)
            .or_else(|| cell(pct_col).and_then(sanitize).map(|pct| pct * 100.0));
        let Some(basis_points) = basis_points else {
            continue;
        };

        if let Ok(observation) = DailyObservation::new(date, basis_points / BASIS_POINTS_PER_UNIT) {
            observations.push(observation);
        }
    }

    Ok(ReturnSeries::new(observations))
}
