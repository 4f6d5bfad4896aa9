//! Gapminder Dash Server
//!
//! Run with: cargo run --bin gapminder-dash [-- --config path/to/config.toml]
//!
//! Loads the dataset once, then serves the dashboard until Ctrl+C.
//! A dataset that cannot be loaded stops the process before it binds.
//!
//! # Configuration
//!
//! See `gapminder-cli config` for a commented template. Environment
//! variables override file settings:
//! - `GAPMINDER_DATA_PATH`: CSV file (default: ./gdp_pcap.csv)
//! - `GAPMINDER_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `GAPMINDER_API_PORT`: Port to listen on (default: 8050)
//! - `GAPMINDER_LOG_LEVEL`: Log level (default: info)
//! - `GAPMINDER_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter directive, takes precedence over the log level

use clap::Parser;
use gapminder_dash::api::{serve, AppState};
use gapminder_dash::config::{Config, LoggingConfig};
use gapminder_dash::dataset::TidyTable;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gapminder-dash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the GDP per capita dashboard")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset path, overrides the config file
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Port to listen on, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // A config file that exists but does not parse stops startup
    let (mut config, source) = match &args.config {
        Some(path) => (Config::load_with_env(path)?, Some(path.clone())),
        None => Config::load_default()?,
    };
    if let Some(data) = args.data {
        config.data.path = data;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting Gapminder Dash v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!("Dataset: {:?}", config.data.path);

    let table = match TidyTable::load(&config.data.path) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            tracing::error!("Failed to load dataset {:?}: {}", config.data.path, e);
            return Err(e.into());
        }
    };

    match table.year_bounds() {
        Some((min, max)) => tracing::info!(
            "{} countries, years {}-{}",
            table.countries().len(),
            min,
            max
        ),
        None => tracing::warn!("Dataset has no year columns; every chart will be empty"),
    }

    let state = AppState::from_config(table, &config);
    serve(state, &config.api).await?;

    tracing::info!("Gapminder Dash stopped");
    Ok(())
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("gapminder_dash={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
