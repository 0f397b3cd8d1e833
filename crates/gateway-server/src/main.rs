//! Perp gateway - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// HTTP gateway for the perp venue and social data APIs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via GATEWAY_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set variables directly.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = gateway_server::GatewayConfig::load(args.config.as_deref())?;

    gateway_telemetry::init_logging(&config.log_dir)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %config.network,
        venue_api = %config.venue_api_url,
        config_api = %config.config_api_url,
        "Starting perp gateway"
    );

    let port = config.port;
    let state = gateway_server::AppState::from_config(config)?;

    gateway_server::run_server(state, port)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
