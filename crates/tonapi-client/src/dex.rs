//! DEX REST API (pool information)

use std::time::Duration;

use crate::USER_AGENT;

/// Client for the DEX's public REST API
#[derive(Clone)]
pub struct DexClient {
    http: reqwest::Client,
    base_url: String,
}

impl DexClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Pool information for a token pair. Informational only: any failure
    /// is logged and reported as `None`.
    pub async fn get_pool_info(&self, token0: &str, token1: &str) -> Option<serde_json::Value> {
        match self.fetch_pool_info(token0, token1).await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(token0, token1, error = %e, "Failed to fetch pool info");
                None
            }
        }
    }

    async fn fetch_pool_info(
        &self,
        token0: &str,
        token1: &str,
    ) -> Result<serde_json::Value, reqwest::Error> {
        self.http
            .get(format!("{}/v1/pools", self.base_url))
            .query(&[("token0", token0), ("token1", token1)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
