use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Fund, SeriesSource, Sources, StatisticsConfig};

/// Prefix for environment overrides, e.g. `FUNDSTATS__STATISTICS__VAR_CONFIDENCE=0.99`.
pub const ENV_PREFIX: &str = "FUNDSTATS";

/// Command-line flags shared by every binary that needs a configuration file.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Path to the TOML configuration file.
    #[arg(long, short = 'c', default_value = "config.toml")]
    pub config: std::path::PathBuf,
}

/// Loads the application configuration from a TOML file.
///
/// The file is layered under environment variables prefixed with `FUNDSTATS`,
/// deserialized into the strongly-typed `Config` struct and validated.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with(path, environment())
}

/// The `FUNDSTATS__SECTION__KEY` override layer, read from the process environment.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

fn load_config_with(path: &Path, env: config::Environment) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), fund = %config.fund.name, "Configuration loaded.");
    Ok(config)
}
