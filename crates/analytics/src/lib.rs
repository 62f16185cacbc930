//! # Fund Analytics
//!
//! Turns a daily return series into the figures a fund factsheet displays.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O. Inputs are `core-types` values already resolved by
//!   the series loader.
//! - **Stateless calculation:** every function recomputes from its inputs, so the
//!   same inputs always produce an identical `FundStatistics`.
//!
//! ## Public API
//!
//! - `aggregate_monthly`: daily decimal returns → compounded monthly percent returns.
//! - `StatisticsEngine`: VaR, Sharpe, Sortino, correlation, best/worst month and
//!   since-inception / annualized performance.
//! - `format_table`: the year × month grid with compounded yearly totals.

// Declare the modules that constitute this crate.
pub mod aggregator;
pub mod engine;
pub mod error;
pub mod report;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::aggregate_monthly;
pub use engine::StatisticsEngine;
pub use error::AnalyticsError;
pub use report::{Correlation, FundStatistics, describe_month};
pub use table::{format_percent, format_table};
