//! Data Transfer Objects for API requests and responses

use serde::{Deserialize, Serialize};
use stonfi::SwapTxSummary;
use ton_tx::TransactionDescriptor;
use tonswap_core::{Network, Token};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub network: Network,
}

impl HealthResponse {
    pub fn ok(network: Network) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            network,
        }
    }
}

/// Token list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensResponse {
    pub network: Network,
    pub tokens: Vec<Token>,
    pub count: usize,
}

/// `GET /tokens` query: hide the token already picked on the other side
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokensQuery {
    pub exclude: Option<String>,
}

/// Estimate request. Tokens are given by address or symbol, the amount in
/// decimal `from_token` units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapEstimateApiRequest {
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    /// Percent; the configured default when omitted
    #[serde(default)]
    pub slippage: Option<f64>,
    #[serde(default)]
    pub user_address: Option<String>,
}

/// Build request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapBuildApiRequest {
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    #[serde(default)]
    pub slippage: Option<f64>,
    pub user_address: String,
}

/// Build response: the descriptor to hand to the wallet unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapBuildApiResponse {
    pub transaction: TransactionDescriptor,
    pub summary: SwapTxSummary,
}

/// `GET /tx/latest/{address}` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TxLatestQuery {
    /// Event id seen before submission; ignored while polling
    pub baseline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxLatestResponse {
    pub address: String,
    /// Whether a transaction was found before the poll timed out
    pub found: bool,
    /// Transaction page when found, account page otherwise
    pub explorer_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxHashRequest {
    /// Base64 BoC returned by the wallet
    pub boc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxHashResponse {
    pub hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolsQuery {
    pub token0: String,
    pub token1: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolsResponse {
    /// Raw DEX answer; `None` when the DEX API is unavailable
    pub pool: Option<serde_json::Value>,
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}
