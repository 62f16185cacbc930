use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("VaR confidence must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),
}
