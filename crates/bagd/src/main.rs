//! bagd - BAG address gateway daemon
//!
//! Serves address lookups by identifier or by house number and postcode,
//! answered by the Kadaster BAG registry selected through `[bag] location`.
//!
//! Usage:
//!   bagd [OPTIONS]
//!
//! Without a config file the huidige bevragingen registry is used on port
//! 18080.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bag_api::{create_router, AppState, Gateway};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{GatewayConfig, Overrides};

#[derive(Parser)]
#[command(name = "bagd")]
#[command(author, version, about = "BAG address gateway daemon")]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "BAGD_CONFIG")]
    config: Option<PathBuf>,

    /// BAG registry location, overrides `[bag] location`
    #[arg(short, long, env = "BAG_LOCATION")]
    location: Option<String>,

    /// Listen port, overrides `[server] port`
    #[arg(short, long, env = "BAGD_PORT")]
    port: Option<u16>,

    /// Registry API key, overrides `[bag] api_key`
    #[arg(long, env = "BAG_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Log as JSON lines
    #[arg(long, env = "BAGD_JSON_LOGS")]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bagd=info,bag_api=info,bag_proxy=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    tracing::info!("Starting bagd (BAG address gateway)");

    if let Some(ref path) = cli.config {
        tracing::info!("Loading config from: {}", path.display());
    }
    let config = GatewayConfig::load(cli.config.as_deref())?.merge(Overrides {
        location: cli.location.as_deref(),
        api_key: cli.api_key.as_deref(),
        port: cli.port,
    });
    config.validate()?;

    // The provider is chosen once and kept for the lifetime of the process
    let provider = bag_proxy::connect(&config.bag).context("Failed to set up BAG provider")?;
    let gateway = Gateway::new(provider).with_lookup_timeout(config.server.request_timeout());
    let app = create_router(AppState::new(gateway));

    let listener = config.server.bind().await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
