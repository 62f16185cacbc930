use thiserror::Error;

/// Reasons a single candidate source is skipped. None of these reach the caller
/// of `SeriesLoader::load`; they only advance the cascade.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source '{source_id}' answered with status {status}")]
    Status { source_id: String, status: u16 },

    #[error("Source '{0}' returned a markup page instead of CSV")]
    MarkupPage(String),

    #[error("Source '{source_id}' did not respond within {millis} ms")]
    Timeout { source_id: String, millis: u128 },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Source '{0}' contained no valid rows")]
    NoValidRows(String),
}
