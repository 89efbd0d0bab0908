//! API route handlers

pub mod health;
pub mod pools;
pub mod swap;
pub mod tokens;
pub mod tx;
pub mod wallet;

use axum::{http::StatusCode, routing::get, Json, Router};
use stonfi::StonfiError;

use crate::dto::ApiError;
use crate::AppState;

/// Error half of every handler's result
pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/pools", get(pools::get_pool_info))
        .nest("/tokens", tokens::router())
        .nest("/wallet", wallet::router())
        .nest("/swap", swap::router())
        .nest("/tx", tx::router())
        .with_state(state)
}

pub(crate) fn stonfi_error_to_api(error: StonfiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.status_code() {
        400 => StatusCode::BAD_REQUEST,
        404 => StatusCode::NOT_FOUND,
        422 => StatusCode::UNPROCESSABLE_ENTITY,
        502 => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(code = error.code(), error = %error, "Swap request failed");
    }

    (status, Json(ApiError::new(error.code(), error.to_string())))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use stonfi::{FixedRateEstimator, SwapFlow};
    use tonapi_client::{Indexer, JettonBalance, JettonWallet};
    use tonswap_core::{AppConfig, IndexerError};
    use tower::ServiceExt;

    use crate::AppState;

    pub const STON: &str = "EQA2kCVNwVsil2EM2mB0SkXytxCqQjS4mttjDpnXmwG9T6bO";
    pub const USDT: &str = "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs";

    /// Indexer with a fixed balance, one fixed event and no jettons
    pub struct StaticIndexer {
        pub balance: u64,
        pub event: Option<String>,
    }

    #[async_trait]
    impl Indexer for StaticIndexer {
        async fn account_balance(&self, _address: &str) -> Result<u64, IndexerError> {
            Ok(self.balance)
        }

        async fn latest_event_id(&self, _address: &str) -> Result<Option<String>, IndexerError> {
            Ok(self.event.clone())
        }

        async fn jetton_balances(
            &self,
            _owner: &str,
            _limit: u32,
        ) -> Result<Vec<JettonBalance>, IndexerError> {
            Ok(Vec::new())
        }

        async fn jetton_wallets(
            &self,
            _owner: &str,
            _jetton: &str,
        ) -> Result<Vec<JettonWallet>, IndexerError> {
            Ok(Vec::new())
        }
    }

    pub fn state_with(indexer: StaticIndexer) -> AppState {
        let config = AppConfig::default();
        let flow = SwapFlow::new(
            config.network.clone(),
            Arc::new(indexer),
            Arc::new(FixedRateEstimator::default()),
        );
        AppState::with_flow(config, flow, None)
    }

    pub fn state() -> AppState {
        state_with(StaticIndexer {
            balance: 1_500_000_000,
            event: None,
        })
    }

    pub async fn get(state: AppState, uri: &str) -> (StatusCode, serde_json::Value) {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(
        state: AppState,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(state, request).await
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = super::create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use super::test_support::get;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(state(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["network"], "mainnet");
    }

    #[test]
    fn test_stonfi_error_mapping() {
        let (status, Json(body)) = stonfi_error_to_api(StonfiError::JettonWalletNotFound {
            owner: STON.to_string(),
            jetton: USDT.to_string(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "jetton_wallet_not_found");

        let (status, _) = stonfi_error_to_api(StonfiError::InvalidSlippage(150.0));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
