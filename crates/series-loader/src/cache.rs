use crate::fetcher::SourceFetcher;
use crate::loader::{LoadedSeries, SeriesLoader};
use configuration::{SeriesSource, Sources};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

pub const RETURNS: &str = "returns";
pub const RISK_FREE: &str = "risk_free";
pub const BENCHMARK: &str = "benchmark";

/// The observable state of a cached series.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Not yet requested, or a load is in flight.
    Pending,
    Ready(Arc<LoadedSeries>),
    Unavailable(String),
}

impl LoadState {
    pub fn ready(&self) -> Option<&Arc<LoadedSeries>> {
        match self {
            LoadState::Ready(series) => Some(series),
            _ => None,
        }
    }
}

type Slot = Arc<OnceCell<Arc<LoadedSeries>>>;

/// Loads each configured series at most once and hands out shared handles.
///
/// Concurrent `get` calls for the same key wait on the same load.
pub struct SeriesCache<F> {
    loader: SeriesLoader<F>,
    sources: HashMap<String, SeriesSource>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<F: SourceFetcher> SeriesCache<F> {
    pub fn new(loader: SeriesLoader<F>, sources: HashMap<String, SeriesSource>) -> Self {
        Self {
            loader,
            sources,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `returns`, `risk_free` and, when configured, `benchmark`.
    pub fn from_config(loader: SeriesLoader<F>, sources: &Sources) -> Self {
        let mut map = HashMap::from([
            (RETURNS.to_string(), sources.returns.clone()),
            (RISK_FREE.to_string(), sources.risk_free.clone()),
        ]);
        if let Some(benchmark) = &sources.benchmark {
            map.insert(BENCHMARK.to_string(), benchmark.clone());
        }
        Self::new(loader, map)
    }

    /// Returns the series for `key`, loading it on first access.
    pub async fn get(&self, key: &str) -> LoadState {
        let Some(source) = self.sources.get(key) else {
            return LoadState::Unavailable(format!("no source configured for '{}'", key));
        };

        let slot = self.slot(key);
        let loaded = slot
            .get_or_init(|| async { Arc::new(self.loader.load_source(source).await) })
            .await;
        LoadState::Ready(Arc::clone(loaded))
    }

    /// Peeks at `key` without starting or awaiting a load.
    pub fn state(&self, key: &str) -> LoadState {
        if !self.sources.contains_key(key) {
            return LoadState::Unavailable(format!("no source configured for '{}'", key));
        }
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        match slots.get(key).and_then(|slot| slot.get()) {
            Some(loaded) => LoadState::Ready(Arc::clone(loaded)),
            None => LoadState::Pending,
        }
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(key.to_string()).or_default())
    }
}
