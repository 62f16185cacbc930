//! # Series Loader
//!
//! Resolves a named daily return series (fund, risk-free rate, benchmark) from an
//! ordered list of candidate sources and normalizes it into a `ReturnSeries`.
//!
//! - Candidates are tried strictly in order; a transport failure, a non-success
//!   status, a timeout, an HTML error page or a file without valid rows moves on
//!   to the next candidate.
//! - When every candidate fails, a fixed inline sample is returned instead, so
//!   loading never fails outward.
//! - `SeriesCache` loads each configured series at most once and exposes its
//!   state as a `LoadState`.

pub mod cache;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod loader;
pub mod parser;

// --- Public API ---
pub use cache::{BENCHMARK, LoadState, RETURNS, RISK_FREE, SeriesCache};
pub use error::LoaderError;
pub use fallback::{INLINE_FALLBACK_CSV, fallback_series};
pub use fetcher::{DefaultFetcher, SourceFetcher};
pub use loader::{LoadedSeries, SeriesLoader, SeriesOrigin};
