//! CLI entry point for the weather rater tool.
//!
//! Provides subcommands for running the full city-ranking pipeline,
//! normalizing a single raw forecast, re-ranking an existing result
//! artifact, and listing the configured cities.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use weather_rater::analyzers::rank::rank_file;
use weather_rater::cities::CityDirectory;
use weather_rater::pipeline::{self, PipelineConfig};
use weather_rater::stats::normalize_forecast;
use weather_rater::{
    fetch::{BasicClient, fetch_bytes},
    parser::parse_forecast,
};

#[derive(Parser)]
#[command(name = "weather_rater")]
#[command(about = "A tool to rank cities by their weather forecasts", long_about = None)]
struct Cli {
    /// Log at debug level instead of info
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch forecasts for every configured city, rate and rank them
    Forecast {
        /// JSON file mapping city names to forecast URLs (bundled set if omitted)
        #[arg(short, long)]
        cities: Option<String>,

        /// File to write the ranked results to
        #[arg(short, long, default_value = "output.json")]
        output: String,

        /// Maximum number of concurrent forecast downloads
        #[arg(short = 'n', long, default_value_t = 5)]
        concurrency: usize,

        /// Per-city fetch timeout in seconds
        #[arg(short, long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Normalize one raw forecast document from a file or URL
    Normalize {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// File to write the per-day metrics to
        #[arg(short, long, default_value = "days.json")]
        output: String,
    },
    /// Re-run the ranking over an existing results file
    Rank {
        /// Results file written by a previous run
        #[arg(short, long, default_value = "output.json")]
        path: String,
    },
    /// List the configured cities and their forecast sources
    ListCities {
        /// JSON file mapping city names to forecast URLs (bundled set if omitted)
        #[arg(short, long)]
        cities: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/weather_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("weather_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_level = if cli.verbose { "debug" } else { "info" };
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(stderr_level.parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    match cli.command {
        Commands::Forecast {
            cities,
            output,
            concurrency,
            timeout_secs,
        } => {
            let directory = load_directory(cities.as_deref())?;
            let timeout = Duration::from_secs(timeout_secs);
            let client = Arc::new(BasicClient::with_timeout(timeout));
            let config = PipelineConfig {
                output_path: PathBuf::from(output),
                fetch_concurrency: concurrency,
                fetch_timeout: timeout,
            };

            let ranked = pipeline::run(client, &directory, &config).await?;
            info!(city_count = ranked.len(), "Forecast pipeline finished");
        }
        Commands::Normalize { source, output } => {
            let bytes = fetcher(&source).await?;
            let forecast = parse_forecast(&bytes)?;
            let days = normalize_forecast(&forecast);

            let doc = serde_json::json!({ "days": days });
            std::fs::write(&output, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("failed to write day metrics to '{output}'"))?;

            info!(day_count = days.len(), output, "Normalization written");
        }
        Commands::Rank { path } => {
            let ranked = rank_file(&path)?;
            info!(city_count = ranked.len(), path, "Ranking rewritten");
        }
        Commands::ListCities { cities } => {
            let directory = load_directory(cities.as_deref())?;

            info!(total = directory.len(), "City directory loaded");

            for (city, url) in directory.iter() {
                info!(city = %city, url = %url, "City");
            }
        }
    }

    Ok(())
}

fn load_directory(cities: Option<&str>) -> Result<CityDirectory> {
    match cities {
        Some(path) => CityDirectory::load(path),
        None => Ok(CityDirectory::bundled()),
    }
}

/// Loads forecast data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}
