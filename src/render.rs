use crate::report::Dashboard;
use analytics::describe_month;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use core_types::{CellTone, MONTH_LABELS, Metric, MonthlyReturn, TableRow};
use series_loader::SeriesOrigin;

fn tone_color(tone: CellTone) -> Option<Color> {
    match tone {
        CellTone::Positive => Some(Color::Green),
        CellTone::Negative => Some(Color::Red),
        CellTone::Flat | CellTone::Empty => None,
    }
}

fn toned_cell(text: &str, tone: CellTone) -> Cell {
    let cell = Cell::new(text).set_alignment(CellAlignment::Right);
    match tone_color(tone) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn describe_origin(origin: &SeriesOrigin) -> String {
    match origin {
        SeriesOrigin::Source(source) => source.clone(),
        SeriesOrigin::InlineFallback => "inline sample (illustrative)".to_string(),
    }
}

fn percent(metric: Option<rust_decimal::Decimal>) -> String {
    metric.map_or_else(|| "N/A".to_string(), |v| format!("{}%", v))
}

/// The key figures block, one metric per row.
pub fn statistics_table(dashboard: &Dashboard) -> Table {
    let stats = &dashboard.statistics;
    let inception = stats
        .inception_date
        .map_or_else(|| "N/A".to_string(), |d| d.to_string());

    let mut table = base_table();
    table.set_header(vec!["Metric", "Value"]);

    let rows: Vec<(&str, String)> = vec![
        ("Daily VaR", format!("{}%", stats.daily_var)),
        ("Monthly VaR", format!("{}%", stats.monthly_var)),
        ("Annualized Volatility", format!("{}%", stats.annualized_volatility)),
        ("Sharpe Ratio", metric_text(&dashboard.headline.sharpe_ratio)),
        ("Sortino Ratio", metric_text(&dashboard.headline.sortino_ratio)),
        ("Correlation", metric_text(&dashboard.headline.correlation)),
        ("Best Month", describe_month(stats.best_month.as_ref())),
        ("Worst Month", describe_month(stats.worst_month.as_ref())),
        ("Since Inception", percent(stats.perf_since_inception)),
        ("Annualized", percent(stats.perf_annualized)),
        ("Inception Date", inception),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value).set_alignment(CellAlignment::Right)]);
    }
    table
}

fn metric_text(metric: &Metric) -> String {
    match metric {
        Metric::Unavailable(reason) => format!("N/A ({})", reason),
        other => other.to_string(),
    }
}

/// The year × month grid, colored by the sign of each cell.
pub fn performance_table(rows: &[TableRow]) -> Table {
    let mut table = base_table();
    let mut header = vec!["Year"];
    header.extend(MONTH_LABELS);
    header.push("Total");
    table.set_header(header);

    for row in rows {
        let mut cells = vec![Cell::new(&row.year)];
        cells.extend(
            row.months
                .iter()
                .enumerate()
                .map(|(idx, text)| toned_cell(text, row.tone(idx))),
        );
        cells.push(toned_cell(&row.total, row.total_tone()));
        table.add_row(cells);
    }
    table
}

pub fn monthly_table(monthly: &[MonthlyReturn]) -> Table {
    let mut table = base_table();
    table.set_header(vec!["Period", "Return"]);
    for month in monthly {
        let text = format!("{:.2}%", month.return_pct);
        let tone = if month.return_pct > 0.0 {
            CellTone::Positive
        } else if month.return_pct < 0.0 {
            CellTone::Negative
        } else {
            CellTone::Flat
        };
        table.add_row(vec![Cell::new(&month.period), toned_cell(&text, tone)]);
    }
    table
}

/// Prints the whole dashboard to stdout.
pub fn print_dashboard(dashboard: &Dashboard) {
    println!("\n{}", dashboard.fund);
    println!("  Returns:    {}", describe_origin(&dashboard.origins.returns));
    println!("  Risk-free:  {}", describe_origin(&dashboard.origins.risk_free));
    match &dashboard.origins.benchmark {
        Some(origin) => println!("  Benchmark:  {}", describe_origin(origin)),
        None => println!("  Benchmark:  not configured"),
    }

    println!("\n{}", statistics_table(dashboard));
    println!("\nMonthly Performance");
    println!("{}", performance_table(&dashboard.table));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_table_has_year_and_total_columns() {
        let mut row = TableRow::new("2024");
        row.months[0] = "0.16%".to_string();
        row.months[2] = "-1.50%".to_string();
        row.total = "-1.34%".to_string();

        let rendered = performance_table(&[row]).to_string();
        assert!(rendered.contains("Year"));
        assert!(rendered.contains("dec"));
        assert!(rendered.contains("Total"));
        assert!(rendered.contains("2024"));
        assert!(rendered.contains("-1.50%"));
    }

    #[test]
    fn monthly_table_lists_every_period() {
        let monthly = vec![
            MonthlyReturn::new("2024-01", 0.16),
            MonthlyReturn::new("2024-02", -0.5),
        ];
        let rendered = monthly_table(&monthly).to_string();
        assert!(rendered.contains("2024-01"));
        assert!(rendered.contains("-0.50%"));
    }

    #[test]
    fn tones_map_to_colors() {
        assert_eq!(tone_color(CellTone::Positive), Some(Color::Green));
        assert_eq!(tone_color(CellTone::Negative), Some(Color::Red));
        assert_eq!(tone_color(CellTone::Flat), None);
        assert_eq!(tone_color(CellTone::Empty), None);
    }

    #[test]
    fn unavailable_metric_shows_reason() {
        let metric = Metric::Unavailable("no benchmark".to_string());
        assert_eq!(metric_text(&metric), "N/A (no benchmark)");
        assert_eq!(metric_text(&Metric::Loading), "Loading...");
    }
}
