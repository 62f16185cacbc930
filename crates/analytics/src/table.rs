use crate::engine::compound_percent;
use core_types::{MonthlyReturn, TableRow};
use std::collections::BTreeMap;

/// Projects monthly returns into one row per year, sorted by year.
///
/// Each populated month holds `"{:.2}%"`. The yearly total compounds the
/// values as displayed in the cells, so a row always adds up visually.
/// Months without data stay empty; they are not 0% months.
pub fn format_table(monthly: &[MonthlyReturn]) -> Vec<TableRow> {
    let mut years: BTreeMap<String, TableRow> = BTreeMap::new();

    for m in monthly {
        let row = years
            .entry(m.year().to_string())
            .or_insert_with(|| TableRow::new(m.year()));
        if let Some(idx) = m.month_index() {
            row.months[idx] = format_percent(m.return_pct);
        }
    }

    for row in years.values_mut() {
        let populated: Vec<f64> = row
            .months
            .iter()
            .filter(|cell| !cell.is_empty())
            .filter_map(|cell| parse_percent(cell))
            .collect();
        if !populated.is_empty() {
            row.total = format_percent(compound_percent(populated) * 100.0);
        }
    }

    years.into_values().collect()
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn parse_percent(cell: &str) -> Option<f64> {
    cell.trim_end_matches('%').parse().ok()
}
