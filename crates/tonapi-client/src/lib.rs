//! tonapi-client: HTTP client for the TON indexer (TonAPI v2 shape)
//!
//! The [`Indexer`] trait is the seam the swap flow depends on; [`IndexerClient`]
//! is the reqwest-backed implementation. The DEX pool-info API lives in [`dex`].

pub mod dex;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tonswap_core::{IndexerConfig, IndexerError};

pub use dex::DexClient;
pub use types::*;

use types::ErrorBody;

pub(crate) const USER_AGENT: &str = "tonswap";

/// Result type for indexer operations
pub type Result<T> = std::result::Result<T, IndexerError>;

/// Read-only indexer queries used by the swap flow
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Native balance in nanotons
    async fn account_balance(&self, address: &str) -> Result<u64>;

    /// Id of the most recent event touching the account, if any
    async fn latest_event_id(&self, address: &str) -> Result<Option<String>>;

    /// Jetton balances held by `owner`, up to `limit` entries
    async fn jetton_balances(&self, owner: &str, limit: u32) -> Result<Vec<JettonBalance>>;

    /// Jetton wallets of `owner` for the `jetton` master
    async fn jetton_wallets(&self, owner: &str, jetton: &str) -> Result<Vec<JettonWallet>>;
}

/// reqwest-backed indexer client
#[derive(Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    api_key: String,
    timeout: Duration,
}

impl IndexerClient {
    pub fn new(base_url: &str, config: &IndexerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| IndexerError::Unreachable {
                url: format!("{}: {}", base_url, e),
            })?;
        let parsed =
            reqwest::Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
                IndexerError::Unreachable {
                    url: format!("{}: {}", base_url, e),
                }
            })?;

        Ok(Self {
            http,
            base_url: parsed,
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL extended by `segments`, each percent-escaped as one segment
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IndexerError::Unreachable {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Get account info (`GET /accounts/{address}`)
    pub async fn get_account(&self, address: &str) -> Result<AccountInfo> {
        self.get_json(&["accounts", address], &[]).await
    }

    /// Get recent events (`GET /accounts/{address}/events`), newest first
    pub async fn get_events(&self, address: &str, limit: u32) -> Result<AccountEvents> {
        self.get_json(
            &["accounts", address, "events"],
            &[("limit", limit.to_string())],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let mut request = self.http.get(url.clone()).query(query);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = timed_request(self.timeout, request.send())
            .await?
            .map_err(|e| map_transport_error(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::debug!(url = %url, status = status.as_u16(), "Indexer returned error status");
            return Err(IndexerError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| IndexerError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl Indexer for IndexerClient {
    async fn account_balance(&self, address: &str) -> Result<u64> {
        Ok(self.get_account(address).await?.balance)
    }

    async fn latest_event_id(&self, address: &str) -> Result<Option<String>> {
        let events = self.get_events(address, 1).await?;
        Ok(events.events.into_iter().next().map(|e| e.event_id))
    }

    async fn jetton_balances(&self, owner: &str, limit: u32) -> Result<Vec<JettonBalance>> {
        let balances: JettonBalances = self
            .get_json(
                &["accounts", owner, "jettons"],
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(balances.balances)
    }

    async fn jetton_wallets(&self, owner: &str, jetton: &str) -> Result<Vec<JettonWallet>> {
        let wallets: JettonWallets = self
            .get_json(
                &["jettons", "wallets"],
                &[("owner", owner.to_string()), ("jetton", jetton.to_string())],
            )
            .await?;
        Ok(wallets.jetton_wallets)
    }
}

/// Run a request future with a deadline
async fn timed_request<T>(
    timeout: Duration,
    fut: impl std::future::Future<Output = T>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| IndexerError::Timeout {
            secs: timeout.as_secs(),
        })
}

fn map_transport_error(url: &str, e: reqwest::Error) -> IndexerError {
    if e.is_timeout() || e.is_connect() {
        IndexerError::Unreachable {
            url: url.to_string(),
        }
    } else {
        IndexerError::ApiError {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            message: e.to_string(),
        }
    }
}
