use crate::error::AnalyticsError;
use crate::report::{Correlation, FundStatistics};
use chrono::NaiveDate;
use core_types::{MonthlyReturn, ReturnSeries};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

const MONTHS_PER_YEAR: f64 = 12.0;

/// A stateless calculator for deriving risk and performance statistics from
/// a fund's daily and monthly returns.
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    confidence: f64,
    inception_date: Option<NaiveDate>,
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            inception_date: None,
        }
    }
}

impl StatisticsEngine {
    pub fn new(confidence: f64) -> Self {
        Self {
            confidence,
            ..Self::default()
        }
    }

    /// Pins the reported inception date instead of deriving it from the data.
    pub fn with_inception_date(mut self, date: Option<NaiveDate>) -> Self {
        self.inception_date = date;
        self
    }

    /// The main entry point for calculating fund statistics.
    ///
    /// # Arguments
    ///
    /// * `daily` - The fund's daily decimal returns.
    /// * `monthly` - `daily` compounded per month, in percent.
    /// * `risk_free` - The risk-free series; only its mean is used.
    /// * `benchmark_monthly` - Benchmark monthly returns for correlation, if any.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `FundStatistics` or an `AnalyticsError` when the
    /// engine was configured with an unusable confidence level.
    pub fn compute(
        &self,
        daily: &ReturnSeries,
        monthly: &[MonthlyReturn],
        risk_free: &ReturnSeries,
        benchmark_monthly: Option<&[MonthlyReturn]>,
    ) -> Result<FundStatistics, AnalyticsError> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(AnalyticsError::InvalidConfidence(self.confidence));
        }

        let mut stats = FundStatistics::new();
        stats.inception_date = self.inception_date.or_else(|| daily.earliest_date());

        let monthly_values: Vec<f64> = monthly.iter().map(|m| m.return_pct).collect();

        self.calculate_risk(daily, &monthly_values, &mut stats);
        self.calculate_ratios(&monthly_values, risk_free, &mut stats);
        self.calculate_performance(monthly, &mut stats);

        stats.correlation = match benchmark_monthly {
            None => Correlation::NoBenchmark,
            Some(benchmark) => match correlation(monthly, benchmark) {
                Some(c) => Correlation::Coefficient(round2(c)),
                None => Correlation::NoCommonPeriods,
            },
        };

        tracing::debug!(
            days = daily.len(),
            months = monthly.len(),
            sharpe = %stats.sharpe_ratio,
            sortino = %stats.sortino_ratio,
            "Fund statistics computed."
        );
        Ok(stats)
    }

    /// VaR on both horizons and annualized volatility.
    fn calculate_risk(&self, daily: &ReturnSeries, monthly: &[f64], stats: &mut FundStatistics) {
        stats.daily_var = round2(value_at_risk(&daily.values(), self.confidence) * 100.0);
        stats.monthly_var = round2(value_at_risk(monthly, self.confidence));
        stats.annualized_volatility = round2(population_std(monthly) * MONTHS_PER_YEAR.sqrt());
    }

    fn calculate_ratios(&self, monthly: &[f64], risk_free: &ReturnSeries, stats: &mut FundStatistics) {
        let rf_mean = risk_free.mean();
        stats.sharpe_ratio = round2(sharpe_ratio(monthly, rf_mean));
        stats.sortino_ratio = round2(sortino_ratio(monthly, rf_mean));
    }

    /// Best/worst month, since-inception and annualized performance.
    fn calculate_performance(&self, monthly: &[MonthlyReturn], stats: &mut FundStatistics) {
        let (best, worst) = best_and_worst(monthly);
        stats.best_month = best.cloned();
        stats.worst_month = worst.cloned();

        if monthly.is_empty() {
            return;
        }

        let total = compound_percent(monthly.iter().map(|m| m.return_pct));
        let annualized = (1.0 + total).powf(MONTHS_PER_YEAR / monthly.len() as f64) - 1.0;
        stats.perf_since_inception = try_round2(total * 100.0);
        // Losses past -100% leave a negative base, which `powf` cannot annualize.
        stats.perf_annualized = try_round2(annualized * 100.0);
        if stats.perf_annualized.is_none() {
            tracing::warn!(total, months = monthly.len(), "Annualized performance is undefined.");
        }
    }
}

/// Rounds to two decimal places, half away from zero.
///
/// A non-finite (or out of range) figure is reported as `0.00` with a warning;
/// use `try_round2` where absence can be expressed.
pub fn round2(value: f64) -> Decimal {
    try_round2(value).unwrap_or_else(|| {
        tracing::warn!(value, "Non-finite figure reported as 0.00.");
        Decimal::ZERO
    })
}

/// `None` when `value` is NaN, infinite or outside the `Decimal` range.
pub fn try_round2(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Empirical VaR: the `floor((1 - confidence) * n)`-th smallest sample.
///
/// Returns `0.0` for an empty sample.
pub fn value_at_risk(samples: &[f64], confidence: f64) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let k = ((1.0 - confidence) * sorted.len() as f64).floor();
    if k < 0.0 {
        return 0.0;
    }
    sorted.get(k as usize).copied().unwrap_or(0.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with an `n` denominator.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Annualized mean excess return over annualized volatility.
pub fn sharpe_ratio(monthly: &[f64], rf_mean: f64) -> f64 {
    if monthly.is_empty() {
        return 0.0;
    }
    let excess = (mean(monthly) - rf_mean) * MONTHS_PER_YEAR;
    let volatility = population_std(monthly) * MONTHS_PER_YEAR.sqrt();
    if volatility == 0.0 { 0.0 } else { excess / volatility }
}

/// Like `sharpe_ratio`, but the denominator only measures months below `rf_mean`.
pub fn sortino_ratio(monthly: &[f64], rf_mean: f64) -> f64 {
    if monthly.is_empty() {
        return 0.0;
    }
    let excess = (mean(monthly) - rf_mean) * MONTHS_PER_YEAR;

    let downside: Vec<f64> = monthly.iter().copied().filter(|r| *r < rf_mean).collect();
    let divisor = downside.len().max(1) as f64;
    let downside_deviation =
        (downside.iter().map(|r| (r - rf_mean) * (r - rf_mean)).sum::<f64>() / divisor).sqrt();

    let annualized = downside_deviation * MONTHS_PER_YEAR.sqrt();
    if annualized == 0.0 { 0.0 } else { excess / annualized }
}

/// Pearson correlation over the periods both series share.
///
/// `None` when there is no common period; `Some(0.0)` when either side is flat.
pub fn correlation(fund: &[MonthlyReturn], benchmark: &[MonthlyReturn]) -> Option<f64> {
    let benchmark_by_period: HashMap<&str, f64> = benchmark
        .iter()
        .map(|m| (m.period.as_str(), m.return_pct))
        .collect();

    // Fund order, one pair per period.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut x = Vec::new();
    let mut y = Vec::new();
    for m in fund {
        let Some(&b) = benchmark_by_period.get(m.period.as_str()) else {
            continue;
        };
        match index.get(m.period.as_str()) {
            Some(&i) => x[i] = m.return_pct,
            None => {
                index.insert(m.period.as_str(), x.len());
                x.push(m.return_pct);
                y.push(b);
            }
        }
    }
    if x.is_empty() {
        return None;
    }

    let (mean_x, mean_y) = (mean(&x), mean(&y));
    let n = x.len() as f64;

    let covariance = x
        .iter()
        .zip(&y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum::<f64>()
        / n;
    let (std_x, std_y) = (population_std(&x), population_std(&y));

    if std_x == 0.0 || std_y == 0.0 {
        Some(0.0)
    } else {
        Some(covariance / (std_x * std_y))
    }
}

/// `Π(1 + r/100) - 1` over percent returns, as a fraction.
pub fn compound_percent(returns_pct: impl IntoIterator<Item = f64>) -> f64 {
    returns_pct
        .into_iter()
        .fold(1.0, |acc, r| acc * (1.0 + r / 100.0))
        - 1.0
}

/// The first month with the highest and the first with the lowest return.
pub fn best_and_worst(monthly: &[MonthlyReturn]) -> (Option<&MonthlyReturn>, Option<&MonthlyReturn>) {
    let mut best: Option<&MonthlyReturn> = None;
    let mut worst: Option<&MonthlyReturn> = None;

    for m in monthly {
        if best.is_none_or(|b| m.return_pct > b.return_pct) {
            best = Some(m);
        }
        if worst.is_none_or(|w| m.return_pct < w.return_pct) {
            worst = Some(m);
        }
    }

    (best, worst)
}
