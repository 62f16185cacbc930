mod render;
mod report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, ConfigArgs, load_config};
use series_loader::{DefaultFetcher, RETURNS, SeriesCache, SeriesLoader};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// The main entry point for the fund statistics application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional: FUNDSTATS__* overrides may live in a .env file.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = init_tracing(cli.log_dir.as_deref());

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => handle_report(args).await,
        Commands::Monthly(args) => handle_monthly(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Risk and performance statistics for a fund's daily return series.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write daily-rotated log files into this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every series and print the statistics and the monthly grid.
    Report(ReportArgs),
    /// Print the compounded monthly returns of the fund series.
    Monthly(MonthlyArgs),
}

#[derive(Parser)]
struct ReportArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Emit one JSON document instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct MonthlyArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

// ==============================================================================
// Tracing
// ==============================================================================

/// Console logs go to stderr so `--json` output on stdout stays clean.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "fundstats.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn build_cache(config: &Config) -> anyhow::Result<SeriesCache<DefaultFetcher>> {
    let fetcher = DefaultFetcher::new().context("Failed to build HTTP client")?;
    let loader = SeriesLoader::new(fetcher, config.sources.request_timeout);
    Ok(SeriesCache::from_config(loader, &config.sources))
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    load_config(path).with_context(|| format!("Failed to load configuration from {}", path.display()))
}

async fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config.config)?;
    let cache = build_cache(&config)?;

    let dashboard = report::build_dashboard(&config, &cache)
        .await
        .context("Failed to compute fund statistics")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        render::print_dashboard(&dashboard);
    }
    Ok(())
}

async fn handle_monthly(args: MonthlyArgs) -> anyhow::Result<()> {
    let config = read_config(&args.config.config)?;
    let cache = build_cache(&config)?;

    let state = cache.get(RETURNS).await;
    let loaded = state
        .ready()
        .context("Returns series is not configured")?;

    if loaded.is_fallback() {
        println!("Using inline sample data; figures are illustrative only.");
    }
    let monthly = analytics::aggregate_monthly(&loaded.series);
    println!("{}", render::monthly_table(&monthly));
    Ok(())
}
