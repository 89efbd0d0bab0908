//! Indexer response shapes
//!
//! Only the fields the swap flow reads are modelled; everything else in the
//! TonAPI payloads is ignored.

use serde::{Deserialize, Serialize};

/// `GET /accounts/{address}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: String,
    /// Balance in nanotons
    pub balance: u64,
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /accounts/{address}/events`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountEvents {
    #[serde(default)]
    pub events: Vec<AccountEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEvent {
    pub event_id: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub in_progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRef {
    pub address: String,
}

/// Jetton master metadata as embedded in balance entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JettonPreview {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u32>,
}

/// One entry of `GET /accounts/{address}/jettons`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JettonBalance {
    /// Raw balance in the jetton's smallest unit
    pub balance: String,
    pub wallet_address: AccountRef,
    pub jetton: JettonPreview,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JettonBalances {
    #[serde(default)]
    pub balances: Vec<JettonBalance>,
}

/// Jetton wallet keyed by owner and master, `GET /jettons/wallets`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JettonWallet {
    pub address: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub jetton: Option<String>,
    #[serde(default)]
    pub balance: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JettonWallets {
    #[serde(default, alias = "wallets")]
    pub jetton_wallets: Vec<JettonWallet>,
}

/// TonAPI error body
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
