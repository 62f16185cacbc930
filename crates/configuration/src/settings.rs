use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::UnitPolicy;
use serde::Deserialize;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub fund: Fund,
    pub sources: Sources,
    #[serde(default)]
    pub statistics: StatisticsConfig,
}

/// Descriptive settings for the fund being reported on.
#[derive(Debug, Clone, Deserialize)]
pub struct Fund {
    pub name: String,
    /// Overrides the inception date derived from the first daily observation.
    #[serde(default)]
    pub inception_date: Option<NaiveDate>,
}

/// Where each logical series is read from.
#[derive(Debug, Clone, Deserialize)]
pub struct Sources {
    /// Upper bound on a single retrieval attempt.
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Daily fund returns.
    pub returns: SeriesSource,
    /// Risk-free rate, usually percent-scaled.
    pub risk_free: SeriesSource,
    /// Benchmark series for correlation. Omit to skip correlation.
    #[serde(default)]
    pub benchmark: Option<SeriesSource>,
}

/// An ordered list of candidate locations plus the unit of the value column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesSource {
    /// URLs (`http://`, `https://`) or file paths, tried in order.
    pub candidates: Vec<String>,
    #[serde(default)]
    pub unit: UnitPolicy,
}

/// Parameters for the statistics engine.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsConfig {
    /// Confidence level for both VaR figures (0.95 == 95%).
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            var_confidence: default_var_confidence(),
        }
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_var_confidence() -> f64 {
    0.95
}

impl Config {
    /// Rejects settings the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = self.statistics.var_confidence;
        if !(c > 0.0 && c < 1.0) {
            return Err(ConfigError::InvalidConfidence(c));
        }

        let mut named = vec![("returns", &self.sources.returns), ("risk_free", &self.sources.risk_free)];
        if let Some(benchmark) = &self.sources.benchmark {
            named.push(("benchmark", benchmark));
        }
        for (name, source) in named {
            if source.candidates.iter().all(|c| c.trim().is_empty()) {
                return Err(ConfigError::NoCandidates(name.to_string()));
            }
        }

        if self.sources.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }
}
