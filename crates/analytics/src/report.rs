use chrono::NaiveDate;
use core_types::MonthlyReturn;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Correlation of the fund's monthly returns against a benchmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Correlation {
    Coefficient(Decimal),
    /// The two monthly series share no `YYYY-MM` period.
    NoCommonPeriods,
    /// No benchmark series was supplied.
    NoBenchmark,
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Coefficient(c) => write!(f, "{}", c),
            Correlation::NoCommonPeriods => write!(f, "No common periods"),
            Correlation::NoBenchmark => write!(f, "N/A"),
        }
    }
}

/// The full set of fund-level risk and performance figures.
///
/// This struct is the final output of the `StatisticsEngine`. Percent figures
/// and ratios are rounded to two places; everything is recomputed wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundStatistics {
    // I. Risk
    /// Empirical daily VaR, in percent.
    pub daily_var: Decimal,
    /// Empirical VaR of the monthly returns, in percent.
    pub monthly_var: Decimal,
    /// Population standard deviation of monthly returns × √12, in percent.
    pub annualized_volatility: Decimal,

    // II. Ratios
    pub sharpe_ratio: Decimal,
    pub sortino_ratio: Decimal,
    pub correlation: Correlation,

    // III. Monthly extremes (None when there are no months)
    pub best_month: Option<MonthlyReturn>,
    pub worst_month: Option<MonthlyReturn>,

    // IV. Performance (None when there are no months)
    pub perf_since_inception: Option<Decimal>,
    pub perf_annualized: Option<Decimal>,
    pub inception_date: Option<NaiveDate>,
}

impl FundStatistics {
    /// Creates a zeroed record, the result for an empty input.
    pub fn new() -> Self {
        Self {
            daily_var: Decimal::ZERO,
            monthly_var: Decimal::ZERO,
            annualized_volatility: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            sortino_ratio: Decimal::ZERO,
            correlation: Correlation::NoBenchmark,
            best_month: None,
            worst_month: None,
            perf_since_inception: None,
            perf_annualized: None,
            inception_date: None,
        }
    }
}

impl Default for FundStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a monthly extreme as `2024-01: 0.16%`, or `N/A`.
pub fn describe_month(month: Option<&MonthlyReturn>) -> String {
    match month {
        Some(m) => format!("{}: {:.2}%", m.period, m.return_pct),
        None => "N/A".to_string(),
    }
}
