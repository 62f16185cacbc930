pub mod enums;
pub mod error;
pub mod sanitize;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{CellTone, Metric, UnitPolicy};
pub use error::CoreError;
pub use sanitize::{sanitize, sanitize_value};
pub use structs::{DailyObservation, MONTH_LABELS, MonthlyReturn, ReturnSeries, TableRow};
