use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read or deserialize configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("statistics.var_confidence must be in (0, 1), got {0}")]
    InvalidConfidence(f64),

    #[error("sources.{0}.candidates must list at least one location")]
    NoCandidates(String),

    #[error("sources.request_timeout must be greater than zero")]
    ZeroTimeout,
}
