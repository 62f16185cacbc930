use crate::error::LoaderError;
use chrono::NaiveDate;
use core_types::{DailyObservation, ReturnSeries, UnitPolicy, sanitize};

/// Number of leading characters inspected when sniffing for an HTML error page.
const MARKUP_SNIFF_LEN: usize = 200;

const HEADER_TOKENS: [&str; 3] = ["date", "return", "value"];

/// The accepted date layouts of column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    /// `YYYY-MM-DD`
    Iso,
    /// `DD.MM.YYYY`
    European,
}

/// The result of parsing one candidate's text.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub series: ReturnSeries,
    /// Rows rejected for a bad date, a missing column or an unparseable value.
    pub dropped: usize,
    /// Rows whose date was reordered from `DD.MM.YYYY`.
    pub european_dates: usize,
}

/// Returns true when `text` looks like an HTML document rather than CSV.
///
/// Misconfigured servers answer unknown paths with an index page and a 200.
pub fn looks_like_markup(text: &str) -> bool {
    let head: String = text
        .trim_start()
        .chars()
        .take(MARKUP_SNIFF_LEN)
        .collect::<String>()
        .to_lowercase();
    head.starts_with("<!doctype html") || head.contains("<html")
}

/// Parses column 0 as an ISO or European date.
pub fn parse_date(raw: &str) -> Option<(NaiveDate, DateLayout)> {
    let raw = raw.trim();
    let b = raw.as_bytes();
    if b.len() != 10 {
        return None;
    }
    let digits_at = |idx: &[usize]| idx.iter().all(|&i| b[i].is_ascii_digit());

    if b[4] == b'-' && b[7] == b'-' && digits_at(&[0, 1, 2, 3, 5, 6, 8, 9]) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|d| (d, DateLayout::Iso));
    }
    if b[2] == b'.' && b[5] == b'.' && digits_at(&[0, 1, 3, 4, 6, 7, 8, 9]) {
        return NaiveDate::parse_from_str(raw, "%d.%m.%Y")
            .ok()
            .map(|d| (d, DateLayout::European));
    }
    None
}

/// Parses a two-column `date,value` file. A header row is optional.
pub fn parse_csv(text: &str, unit: UnitPolicy) -> Result<ParsedCsv, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut parsed = ParsedCsv::default();
    let mut observations = Vec::new();
    let mut first = true;

    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if first {
            first = false;
            if is_header(&record) {
                continue;
            }
        }

        match parse_row(&record, unit) {
            Some((observation, layout)) => {
                if layout == DateLayout::European {
                    parsed.european_dates += 1;
                }
                observations.push(observation);
            }
            None => parsed.dropped += 1,
        }
    }

    parsed.series = ReturnSeries::new(observations);
    Ok(parsed)
}

fn is_header(record: &csv::StringRecord) -> bool {
    record.iter().take(2).any(|field| {
        let field = field.to_lowercase();
        HEADER_TOKENS.iter().any(|token| field.contains(token))
    })
}

fn parse_row(
    record: &csv::StringRecord,
    unit: UnitPolicy,
) -> Option<(DailyObservation, DateLayout)> {
    if record.len() < 2 {
        return None;
    }
    let (date, layout) = parse_date(record.get(0)?)?;
    let value = unit.apply(sanitize(record.get(1)?)?);
    DailyObservation::new(date, value)
        .ok()
        .map(|observation| (observation, layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn both_layouts_normalize_to_the_same_date() {
        let (iso, iso_layout) = parse_date("2024-01-16").unwrap();
        let (eu, eu_layout) = parse_date("16.01.2024").unwrap();
        assert_eq!(iso, eu);
        assert_eq!(iso, ymd(2024, 1, 16));
        assert_eq!(iso_layout, DateLayout::Iso);
        assert_eq!(eu_layout, DateLayout::European);
    }

    #[test]
    fn rejects_other_date_shapes() {
        assert!(parse_date("2024/01/16").is_none());
        assert!(parse_date("1.1.2024").is_none());
        assert!(parse_date("01/16/2024").is_none());
        assert!(parse_date("2024-1-16").is_none());
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn detects_markup_pages() {
        assert!(looks_like_markup("<!DOCTYPE html><html><body>404</body></html>"));
        assert!(looks_like_markup("\n\n  <html lang=\"en\">"));
        assert!(looks_like_markup("<!-- dev server -->\n<HTML>"));
        assert!(!looks_like_markup("Date,Return\n2024-01-10,0.001"));
    }

    #[test]
    fn markup_beyond_sniff_window_is_ignored() {
        let text = format!("{}<html>", "2024-01-10,0.001\n".repeat(20));
        assert!(!looks_like_markup(&text));
    }

    #[test]
    fn skips_header_and_blank_lines() {
        let text = "Date,Daily Return\n\n2024-01-10,0.001\n\n16.01.2024,\"-0.002\"\n";
        let parsed = parse_csv(text, UnitPolicy::Fraction).unwrap();

        let obs = parsed.series.observations();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].date, ymd(2024, 1, 10));
        assert_eq!(obs[0].value, 0.001);
        assert_eq!(obs[1].date, ymd(2024, 1, 16));
        assert_eq!(obs[1].value, -0.002);
        assert_eq!(parsed.european_dates, 1);
        assert_eq!(parsed.dropped, 0);
    }

    #[test]
    fn headerless_files_keep_their_first_row() {
        let parsed = parse_csv("2024-01-10,0.001\n2024-01-11,0.002", UnitPolicy::Fraction).unwrap();
        assert_eq!(parsed.series.len(), 2);
    }

    #[test]
    fn drops_malformed_rows() {
        let text = "2024-01-10,0.001\nnot-a-date,0.1\n2024-01-12\n2024-01-13,n/a\n2024-01-14,\"1,000\"";
        let parsed = parse_csv(text, UnitPolicy::Fraction).unwrap();

        assert_eq!(parsed.series.len(), 2);
        assert_eq!(parsed.series.observations()[1].value, 1000.0);
        assert_eq!(parsed.dropped, 3);
    }

    #[test]
    fn percent_policy_scales_values() {
        let parsed = parse_csv("Date,Value\n2024-01-10,5.25%", UnitPolicy::Percent).unwrap();
        assert!((parsed.series.observations()[0].value - 0.0525).abs() < 1e-12);
    }

    #[test]
    fn preserves_source_row_order() {
        let parsed = parse_csv("2024-02-01,0.01\n2024-01-01,0.02", UnitPolicy::Fraction).unwrap();
        let dates: Vec<_> = parsed.series.observations().iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![ymd(2024, 2, 1), ymd(2024, 1, 1)]);
    }
}
