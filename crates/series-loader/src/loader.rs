use crate::error::LoaderError;
use crate::fallback::fallback_series;
use crate::fetcher::SourceFetcher;
use crate::parser::{looks_like_markup, parse_csv};
use configuration::SeriesSource;
use core_types::{ReturnSeries, UnitPolicy};
use serde::Serialize;
use std::time::Duration;

/// Where a loaded series actually came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum SeriesOrigin {
    Source(String),
    InlineFallback,
}

/// A series together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedSeries {
    pub series: ReturnSeries,
    pub origin: SeriesOrigin,
}

impl LoadedSeries {
    pub fn is_fallback(&self) -> bool {
        self.origin == SeriesOrigin::InlineFallback
    }
}

/// Resolves a return series from an ordered list of candidate sources.
///
/// Candidates are tried one after another; the first that yields at least one
/// valid row wins. When every candidate fails the inline sample is returned,
/// so `load` never fails.
pub struct SeriesLoader<F> {
    fetcher: F,
    timeout: Duration,
}

impl<F: SourceFetcher> SeriesLoader<F> {
    pub fn new(fetcher: F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn load_source(&self, source: &SeriesSource) -> LoadedSeries {
        self.load(&source.candidates, source.unit).await
    }

    #[tracing::instrument(name = "load_series", skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn load(&self, candidates: &[String], unit: UnitPolicy) -> LoadedSeries {
        for candidate in candidates {
            tracing::debug!(source = %candidate, "Attempting candidate.");
            match self.try_candidate(candidate, unit).await {
                Ok(series) => {
                    return LoadedSeries {
                        series,
                        origin: SeriesOrigin::Source(candidate.clone()),
                    };
                }
                Err(e) => {
                    tracing::warn!(source = %candidate, error = %e, "Candidate failed. Trying next source.");
                }
            }
        }

        tracing::warn!("All candidate sources failed. Falling back to inline sample data.");
        LoadedSeries {
            series: fallback_series(),
            origin: SeriesOrigin::InlineFallback,
        }
    }

    async fn try_candidate(&self, source: &str, unit: UnitPolicy) -> Result<ReturnSeries, LoaderError> {
        let text = tokio::time::timeout(self.timeout, self.fetcher.fetch(source))
            .await
            .map_err(|_| LoaderError::Timeout {
                source_id: source.to_string(),
                millis: self.timeout.as_millis(),
            })??;

        if looks_like_markup(&text) {
            return Err(LoaderError::MarkupPage(source.to_string()));
        }

        let parsed = parse_csv(&text, unit)?;
        if parsed.european_dates > 0 {
            tracing::debug!(source = %source, eu_dates = parsed.european_dates, "Converted European date formats.");
        }
        if parsed.dropped > 0 {
            tracing::info!(source = %source, dropped = parsed.dropped, "Dropped malformed rows.");
        }
        if parsed.series.is_empty() {
            return Err(LoaderError::NoValidRows(source.to_string()));
        }

        tracing::info!(source = %source, rows = parsed.series.len(), "Series loaded.");
        Ok(parsed.series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubFetcher(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl SourceFetcher for StubFetcher {
        async fn fetch(&self, source: &str) -> Result<String, LoaderError> {
            self.0
                .get(source)
                .map(|s| s.to_string())
                .ok_or_else(|| LoaderError::Status {
                    source_id: source.to_string(),
                    status: 404,
                })
        }
    }

    struct SlowFetcher;

    #[async_trait]
    impl SourceFetcher for SlowFetcher {
        async fn fetch(&self, _source: &str) -> Result<String, LoaderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("2024-01-10,0.01".to_string())
        }
    }

    fn candidates(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn skips_markup_and_missing_candidates() {
        let fetcher = StubFetcher(HashMap::from([
            ("/Returns.csv", "<!DOCTYPE html><html></html>"),
            ("/assets/Returns.csv", "Date,Return\n2024-01-10,0.01\n2024-01-11,-0.02"),
        ]));
        let loader = SeriesLoader::new(fetcher, Duration::from_secs(1));

        let loaded = loader
            .load(&candidates(&["/missing.csv", "/Returns.csv", "/assets/Returns.csv"]), UnitPolicy::Fraction)
            .await;

        assert_eq!(loaded.origin, SeriesOrigin::Source("/assets/Returns.csv".to_string()));
        assert_eq!(loaded.series.values(), vec![0.01, -0.02]);
    }

    #[tokio::test]
    async fn candidate_without_valid_rows_advances() {
        let fetcher = StubFetcher(HashMap::from([
            ("a.csv", "Date,Return\nbad,row"),
            ("b.csv", "2024-01-10,0.5%"),
        ]));
        let loader = SeriesLoader::new(fetcher, Duration::from_secs(1));

        let loaded = loader.load(&candidates(&["a.csv", "b.csv"]), UnitPolicy::Percent).await;
        assert_eq!(loaded.origin, SeriesOrigin::Source("b.csv".to_string()));
        assert!((loaded.series.values()[0] - 0.005).abs() < 1e-12);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_candidate_times_out_into_fallback() {
        let loader = SeriesLoader::new(SlowFetcher, Duration::from_secs(2));
        let loaded = loader.load(&candidates(&["slow.csv"]), UnitPolicy::Fraction).await;

        assert!(loaded.is_fallback());
        assert_eq!(loaded.series.len(), 5);
    }

    #[tokio::test]
    async fn empty_candidate_list_uses_fallback() {
        let loader = SeriesLoader::new(StubFetcher(HashMap::new()), Duration::from_secs(1));
        let loaded = loader.load(&[], UnitPolicy::Fraction).await;
        assert!(loaded.is_fallback());
    }
}
