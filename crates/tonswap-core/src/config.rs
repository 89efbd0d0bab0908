//! Configuration types for TonSwap

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Network};

/// Environment variable pointing at a JSON config file
pub const CONFIG_PATH_ENV: &str = "TONSWAP_CONFIG";

/// Environment variable selecting the network preset
pub const NETWORK_ENV: &str = "TONSWAP_NETWORK";

/// Everything that differs between mainnet and testnet deployments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network: Network,

    /// Indexer base URL (e.g., "https://tonapi.io/v2")
    pub indexer_url: String,

    /// DEX REST API base URL (pool info)
    pub dex_api_url: String,

    /// DEX router contract address
    pub router_address: String,

    /// Block explorer host, without scheme
    pub explorer_host: String,
}

impl NetworkConfig {
    pub fn mainnet() -> Self {
        Self {
            network: Network::Mainnet,
            indexer_url: "https://tonapi.io/v2".to_string(),
            dex_api_url: "https://api.ston.fi".to_string(),
            router_address: "EQB3ncyBUTjZUA5EnFKR5_EnOMI9V1tTEAAPaiU71gc4TiUt".to_string(),
            explorer_host: "tonviewer.com".to_string(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            indexer_url: "https://testnet.tonapi.io/v2".to_string(),
            dex_api_url: "https://api.ston.fi".to_string(),
            router_address: "kQBsGx9ArADUrREB34W-ghgsCgBShvfUr4Jvlu-0KGc33a1n".to_string(),
            explorer_host: "testnet.tonviewer.com".to_string(),
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
        }
    }

    pub fn is_testnet(&self) -> bool {
        self.network.is_testnet()
    }

    /// Explorer page for a single transaction or event
    pub fn transaction_url(&self, tx_id: &str) -> String {
        format!("https://{}/transaction/{}", self.explorer_host, tx_id)
    }

    /// Explorer page for an account, used when no transaction id is known
    pub fn account_url(&self, address: &str) -> String {
        format!("https://{}/{}", self.explorer_host, address)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Indexer client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Bearer token for authenticated endpoints (optional)
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Network endpoints and contract addresses
    #[serde(default)]
    pub network: NetworkConfig,

    /// Indexer client settings
    #[serde(default)]
    pub indexer: IndexerConfig,

    /// Token list to offer; follows `network.network` when unset
    #[serde(default)]
    pub registry: Option<Network>,

    /// Slippage tolerance (percent) preselected for new swaps
    #[serde(default = "default_slippage")]
    pub default_slippage: f64,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Browser origins allowed to call the API
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_slippage() -> f64 {
    0.5
}

fn default_api_port() -> u16 {
    19080
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            indexer: IndexerConfig::default(),
            registry: None,
            default_slippage: default_slippage(),
            api_port: default_api_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl AppConfig {
    /// Load from an optional JSON file, then apply a network override.
    ///
    /// A network override swaps in that network's preset endpoints.
    pub fn load(path: Option<&Path>, network_override: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let display = path.display().to_string();
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: display.clone(),
                    source,
                })?;
                serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
                    path: display,
                    message: e.to_string(),
                })?
            }
            None => Self::default(),
        };

        if let Some(raw) = network_override {
            let network: Network = raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: NETWORK_ENV,
                message,
            })?;
            if network != config.network.network {
                config.network = NetworkConfig::for_network(network);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load using `TONSWAP_CONFIG` and `TONSWAP_NETWORK`
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        let network = std::env::var(NETWORK_ENV).ok();
        Self::load(path.as_deref().map(Path::new), network.as_deref())
    }

    /// Network whose token registry is offered
    pub fn registry_network(&self) -> Network {
        self.registry.unwrap_or(self.network.network)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.default_slippage) {
            return Err(ConfigError::InvalidValue {
                key: "default_slippage",
                message: format!("{} is outside 0..=100", self.default_slippage),
            });
        }
        if self.indexer.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "indexer.timeout_secs",
                message: "must be positive".to_string(),
            });
        }
        for origin in &self.cors_origins {
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            let host = origin.split_once("://").map(|(_, h)| h).unwrap_or("");
            if !scheme_ok || host.is_empty() || host.contains('/') {
                return Err(ConfigError::InvalidValue {
                    key: "cors_origins",
                    message: format!("{} is not a scheme://host[:port] origin", origin),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.network.network, Network::Mainnet);
        assert_eq!(config.network.indexer_url, "https://tonapi.io/v2");
        assert_eq!(config.api_port, 19080);
        assert_eq!(config.default_slippage, 0.5);
        assert_eq!(config.registry_network(), Network::Mainnet);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.network, config.network);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{"api_port": 8080}"#).unwrap();
        assert_eq!(parsed.api_port, 8080);
        assert_eq!(parsed.indexer.timeout_secs, 30);
        assert_eq!(parsed.network, NetworkConfig::mainnet());
    }

    #[test]
    fn test_network_override_swaps_preset() {
        let config = AppConfig::load(None, Some("testnet")).unwrap();
        assert_eq!(config.network, NetworkConfig::testnet());
        assert!(config.network.is_testnet());
        assert_eq!(config.registry_network(), Network::Testnet);
    }

    #[test]
    fn test_invalid_network_override() {
        let err = AppConfig::load(None, Some("devnet")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: NETWORK_ENV, .. }));
    }

    #[test]
    fn test_cors_origins() {
        let config = AppConfig::default();
        assert!(config.cors_origins.iter().all(|o| o.contains("5173")));

        let mut config = AppConfig::default();
        config.cors_origins = vec!["https://swap.example.org".to_string()];
        assert!(config.validate().is_ok());

        for bad in ["*", "swap.example.org", "https://swap.example.org/", "https://"] {
            config.cors_origins = vec![bad.to_string()];
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidValue { key: "cors_origins", .. })),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn test_missing_config_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/tonswap.json")), None).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_explorer_urls() {
        let testnet = NetworkConfig::testnet();
        assert_eq!(
            testnet.transaction_url("abc123"),
            "https://testnet.tonviewer.com/transaction/abc123"
        );
        let mainnet = NetworkConfig::mainnet();
        assert_eq!(mainnet.account_url("EQxyz"), "https://tonviewer.com/EQxyz");
    }
}
