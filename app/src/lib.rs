//! TonSwap application library

use anyhow::Context;
use tonswap_api::AppState;
use tonswap_core::AppConfig;
use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "tonswap=debug,stonfi=debug,info";

/// Install the global tracing subscriber
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load configuration from the environment and serve the API until shutdown
pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    tracing::info!(
        network = %config.network.network,
        registry = %config.registry_network(),
        port = config.api_port,
        "Starting TonSwap"
    );

    let port = config.api_port;
    let state = AppState::from_config(config).context("Failed to initialise application state")?;
    tonswap_api::start_server(state, port)
        .await
        .context("API server stopped")?;

    Ok(())
}
