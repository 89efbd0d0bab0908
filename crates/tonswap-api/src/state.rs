//! Application state shared across API handlers

use std::sync::Arc;
use std::time::Duration;

use stonfi::{FixedRateEstimator, SwapFlow};
use thiserror::Error;
use tonapi_client::{DexClient, IndexerClient};
use tonswap_core::{AppConfig, IndexerError, TokenRegistry};

/// Errors that can occur while assembling the state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to create indexer client: {0}")]
    Indexer(#[from] IndexerError),

    #[error("Failed to create DEX client: {0}")]
    Dex(String),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    registry: TokenRegistry,
    flow: SwapFlow,
    dex: Option<DexClient>,
}

impl AppState {
    /// Wire the HTTP-backed indexer and DEX clients for `config.network`
    pub fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let indexer = IndexerClient::new(&config.network.indexer_url, &config.indexer)?;
        let dex = DexClient::new(
            &config.network.dex_api_url,
            Duration::from_secs(config.indexer.timeout_secs),
        )
        .map_err(|e| StateError::Dex(e.to_string()))?;

        tracing::info!(
            network = %config.network.network,
            indexer = %indexer.base_url(),
            router = %config.network.router_address,
            "Creating application state"
        );

        let flow = SwapFlow::new(
            config.network.clone(),
            Arc::new(indexer),
            Arc::new(FixedRateEstimator::default()),
        );
        Ok(Self::with_flow(config, flow, Some(dex)))
    }

    /// Create with an already assembled swap flow
    pub fn with_flow(config: AppConfig, flow: SwapFlow, dex: Option<DexClient>) -> Self {
        let registry = TokenRegistry::for_network(config.registry_network());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                flow,
                dex,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.inner.registry
    }

    pub fn flow(&self) -> &SwapFlow {
        &self.inner.flow
    }

    pub fn dex(&self) -> Option<&DexClient> {
        self.inner.dex.as_ref()
    }
}
