use analytics::{
    AnalyticsError, Correlation, FundStatistics, StatisticsEngine, aggregate_monthly, format_table,
};
use configuration::Config;
use core_types::{Metric, MonthlyReturn, TableRow};
use series_loader::{
    BENCHMARK, LoadState, LoadedSeries, RETURNS, RISK_FREE, SeriesCache, SeriesOrigin,
    SourceFetcher,
};
use serde::Serialize;
use std::sync::Arc;

/// Where each input series came from.
#[derive(Debug, Clone, Serialize)]
pub struct Origins {
    pub returns: SeriesOrigin,
    pub risk_free: SeriesOrigin,
    pub benchmark: Option<SeriesOrigin>,
}

/// The headline ratios as dashboard cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Headline {
    pub sharpe_ratio: Metric,
    pub sortino_ratio: Metric,
    pub correlation: Metric,
}

/// Everything a reporting surface needs, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub fund: String,
    pub origins: Origins,
    pub headline: Headline,
    pub statistics: FundStatistics,
    pub monthly: Vec<MonthlyReturn>,
    pub table: Vec<TableRow>,
}

pub fn engine_for(config: &Config) -> StatisticsEngine {
    StatisticsEngine::new(config.statistics.var_confidence)
        .with_inception_date(config.fund.inception_date)
}

/// Loads every configured series (concurrently, each at most once) and derives
/// the statistics, the monthly series and the year×month table.
pub async fn build_dashboard<F: SourceFetcher>(
    config: &Config,
    cache: &SeriesCache<F>,
) -> Result<Dashboard, AnalyticsError> {
    let (returns, risk_free, benchmark) =
        futures::join!(cache.get(RETURNS), cache.get(RISK_FREE), cache.get(BENCHMARK));

    let returns = ready_or_fallback(RETURNS, returns);
    let risk_free = ready_or_fallback(RISK_FREE, risk_free);
    let benchmark = benchmark.ready().cloned();

    for (name, loaded) in [(RETURNS, &returns), (RISK_FREE, &risk_free)] {
        if loaded.is_fallback() {
            tracing::warn!(series = name, "Using inline sample data; figures are illustrative only.");
        }
    }

    let engine = engine_for(config);
    let monthly = aggregate_monthly(&returns.series);
    let benchmark_monthly = benchmark.as_ref().map(|b| aggregate_monthly(&b.series));
    let statistics = engine.compute(
        &returns.series,
        &monthly,
        &risk_free.series,
        benchmark_monthly.as_deref(),
    )?;

    let headline = headline(cache, Some(&statistics));
    let table = format_table(&monthly);

    tracing::info!(
        fund = %config.fund.name,
        months = monthly.len(),
        years = table.len(),
        "Dashboard built."
    );

    Ok(Dashboard {
        fund: config.fund.name.clone(),
        origins: Origins {
            returns: returns.origin.clone(),
            risk_free: risk_free.origin.clone(),
            benchmark: benchmark.map(|b| b.origin.clone()),
        },
        headline,
        statistics,
        monthly,
        table,
    })
}

/// Resolves the headline ratios from whatever the cache holds right now,
/// without starting or awaiting any load. `statistics` is `None` until the
/// engine has run.
pub fn headline<F: SourceFetcher>(
    cache: &SeriesCache<F>,
    statistics: Option<&FundStatistics>,
) -> Headline {
    let inputs = [cache.state(RETURNS), cache.state(RISK_FREE)];

    let unavailable = inputs.iter().find_map(|state| match state {
        LoadState::Unavailable(reason) => Some(reason.clone()),
        _ => None,
    });
    if let Some(reason) = unavailable {
        let cell = Metric::Unavailable(reason);
        return Headline {
            sharpe_ratio: cell.clone(),
            sortino_ratio: cell.clone(),
            correlation: cell,
        };
    }

    let stats = match statistics {
        Some(stats) if inputs.iter().all(|state| state.ready().is_some()) => stats,
        _ => {
            return Headline {
                sharpe_ratio: Metric::Loading,
                sortino_ratio: Metric::Loading,
                correlation: Metric::Loading,
            };
        }
    };

    let correlation = match (cache.state(BENCHMARK), &stats.correlation) {
        (LoadState::Pending, _) => Metric::Loading,
        (_, Correlation::Coefficient(c)) => Metric::Value(*c),
        (_, Correlation::NoCommonPeriods) => Metric::Unavailable("no common periods".to_string()),
        (LoadState::Unavailable(reason), _) => Metric::Unavailable(reason),
        (_, Correlation::NoBenchmark) => Metric::Unavailable("no benchmark".to_string()),
    };

    Headline {
        sharpe_ratio: Metric::Value(stats.sharpe_ratio),
        sortino_ratio: Metric::Value(stats.sortino_ratio),
        correlation,
    }
}

/// `get` only reports `Unavailable` for unconfigured keys, which config
/// validation rules out for returns and risk-free; fall back regardless.
fn ready_or_fallback(name: &str, state: LoadState) -> Arc<LoadedSeries> {
    match state {
        LoadState::Ready(loaded) => loaded,
        other => {
            tracing::error!(series = name, state = ?other, "Series not ready after load.");
            Arc::new(LoadedSeries {
                series: series_loader::fallback_series(),
                origin: SeriesOrigin::InlineFallback,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use configuration::{Fund, SeriesSource, Sources, StatisticsConfig};
    use core_types::UnitPolicy;
    use rust_decimal_macros::dec;
    use series_loader::{LoaderError, SeriesLoader};
    use std::collections::HashMap;
    use std::time::Duration;

    struct StubFetcher(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl SourceFetcher for StubFetcher {
        async fn fetch(&self, source: &str) -> Result<String, LoaderError> {
            match self.0.get(source) {
                Some(text) => Ok(text.to_string()),
                None => Ok("<!DOCTYPE html><html></html>".to_string()),
            }
        }
    }

    fn source(candidate: &str, unit: UnitPolicy) -> SeriesSource {
        SeriesSource {
            candidates: vec![candidate.to_string()],
            unit,
        }
    }

    fn config(with_benchmark: bool) -> Config {
        Config {
            fund: Fund {
                name: "Test Fund".to_string(),
                inception_date: None,
            },
            sources: Sources {
                request_timeout: Duration::from_secs(1),
                returns: source("Returns.csv", UnitPolicy::Fraction),
                risk_free: source("RF.csv", UnitPolicy::Percent),
                benchmark: with_benchmark.then(|| source("SP500.csv", UnitPolicy::Fraction)),
            },
            statistics: StatisticsConfig::default(),
        }
    }

    fn cache(config: &Config, files: HashMap<&'static str, &'static str>) -> SeriesCache<StubFetcher> {
        let loader = SeriesLoader::new(StubFetcher(files), config.sources.request_timeout);
        SeriesCache::from_config(loader, &config.sources)
    }

    const RETURNS_CSV: &str = "Date,Return\n2024-01-02,0.01\n2024-01-03,0.02\n2024-02-01,-0.01\n2024-03-01,0.005";
    const RF_CSV: &str = "Date,Value\n2024-01-02,0.00\n2024-02-01,0.00";

    #[tokio::test]
    async fn headline_is_loading_before_any_load() {
        let config = config(true);
        let cache = cache(&config, HashMap::new());

        let headline = headline(&cache, None);
        assert_eq!(headline.sharpe_ratio, Metric::Loading);
        assert_eq!(headline.correlation, Metric::Loading);
    }

    #[tokio::test]
    async fn headline_reuses_computed_statistics() {
        let config = config(true);
        let cache = cache(
            &config,
            HashMap::from([("Returns.csv", RETURNS_CSV), ("RF.csv", RF_CSV)]),
        );
        cache.get(RETURNS).await;
        cache.get(RISK_FREE).await;

        let mut stats = FundStatistics::new();
        stats.sharpe_ratio = dec!(9.99);
        stats.sortino_ratio = dec!(-1.25);
        stats.correlation = Correlation::Coefficient(dec!(0.50));

        // Benchmark not fetched yet: ratios are ready, correlation is not.
        let headline = headline(&cache, Some(&stats));
        assert_eq!(headline.sharpe_ratio, Metric::Value(dec!(9.99)));
        assert_eq!(headline.sortino_ratio, Metric::Value(dec!(-1.25)));
        assert_eq!(headline.correlation, Metric::Loading);

        cache.get(BENCHMARK).await;
        let headline = super::headline(&cache, Some(&stats));
        assert_eq!(headline.correlation, Metric::Value(dec!(0.50)));
    }

    #[tokio::test]
    async fn dashboard_uses_live_sources() {
        let config = config(true);
        let cache = cache(
            &config,
            HashMap::from([("Returns.csv", RETURNS_CSV), ("RF.csv", RF_CSV), ("SP500.csv", RETURNS_CSV)]),
        );

        let dashboard = build_dashboard(&config, &cache).await.unwrap();

        assert_eq!(dashboard.origins.returns, SeriesOrigin::Source("Returns.csv".to_string()));
        assert_eq!(dashboard.monthly.len(), 3);
        assert_eq!(dashboard.table.len(), 1);
        assert_eq!(dashboard.statistics.correlation, Correlation::Coefficient(dec!(1.00)));
        assert_eq!(dashboard.headline.correlation, Metric::Value(dec!(1.00)));
        assert_eq!(
            dashboard.headline.sharpe_ratio,
            Metric::Value(dashboard.statistics.sharpe_ratio)
        );
    }

    #[tokio::test]
    async fn dashboard_degrades_to_inline_sample() {
        let config = config(false);
        let cache = cache(&config, HashMap::new());

        let dashboard = build_dashboard(&config, &cache).await.unwrap();

        assert_eq!(dashboard.origins.returns, SeriesOrigin::InlineFallback);
        assert_eq!(dashboard.origins.benchmark, None);
        assert_eq!(dashboard.monthly.len(), 1);
        assert_eq!(dashboard.monthly[0].period, "2024-01");
        assert_eq!(dashboard.table[0].months[0], "0.16%");
        assert!(matches!(dashboard.headline.correlation, Metric::Unavailable(_)));
    }
}
