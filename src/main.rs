//! WarpDeck Server
//!
//! Run with: cargo run --bin warpdeck
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or the default locations),
//! then environment variables, then command-line flags:
//! - `WARPDECK_DATA_DIR` / `DATA_DIR`: Data directory (default: ./data)
//! - `WARPDECK_DASHBOARDS_DIR` / `DASHBOARDS_DIR`: Dashboard documents (default: <data>/dashboards)
//! - `WARPDECK_HOST`: Host to bind to (default: 0.0.0.0)
//! - `WARPDECK_PORT` / `PORT`: Port to listen on (default: 8089)
//! - `WARPDECK_CLIENT_DIR`: Built client bundle (default: ./warpdeck-ui/dist)
//! - `RUST_LOG`: Log filter, overrides the configured level

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warpdeck::api::{serve, ApiConfig, AppState};
use warpdeck::config::{generate_default_config, Config, LoggingConfig};
use warpdeck::favicon::FaviconFetcher;
use warpdeck::store::FileStore;

#[derive(Parser)]
#[command(name = "warpdeck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Self-hosted start page server")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(long)]
    data_dir: Option<String>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::Config { output }) = args.command {
        let config = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, &config)
                    .with_context(|| format!("writing config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", config),
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting WarpDeck v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let store_config = config.storage.store_config();
    tracing::info!("Data directory: {:?}", store_config.data_dir);
    tracing::info!("Dashboards directory: {:?}", store_config.dashboards_dir());

    let images_dir = store_config.images_dir();
    let store = Arc::new(
        FileStore::open(store_config)
            .await
            .context("opening data directory")?,
    );

    let settings = store.load_settings().await?;
    tracing::info!(
        dashboards = settings.dashboards.len(),
        default = %settings.default_dashboard_slug,
        "Store ready"
    );

    // Favicon acquisition
    let favicons = Arc::new(FaviconFetcher::new(config.favicon.fetcher_config(images_dir))?);
    if favicons.is_enabled() {
        tracing::info!(strategies = ?config.favicon.strategies, "Favicon acquisition enabled");
    } else {
        tracing::info!("Favicon acquisition disabled");
    }

    let mut api_config = ApiConfig::from(&config.api);
    match &api_config.client_dir {
        Some(dir) if dir.join("index.html").is_file() => {
            tracing::info!("Serving client from {:?}", dir);
        }
        Some(dir) => {
            tracing::warn!("No client bundle at {:?}, serving the API only", dir);
            api_config.client_dir = None;
        }
        None => {}
    }

    let state = AppState::new(store, favicons, api_config.clone());
    serve(state, &api_config).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("warpdeck={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
