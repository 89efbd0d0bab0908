//! Wallet balance route

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use stonfi::WalletBalance;
use ton_tx::TonAddress;

use super::ApiResult;
use crate::dto::ApiError;
use crate::AppState;

/// Create wallet routes
pub fn router() -> Router<AppState> {
    Router::new().route("/:address/balance", get(get_balance))
}

/// GET /wallet/:address/balance - Native balance in TON
///
/// Indexer failures degrade to a zero balance.
async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<WalletBalance> {
    TonAddress::parse(&address).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("invalid_address", e.to_string())),
        )
    })?;

    Ok(Json(state.flow().wallet_balance(&address).await))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_balance() {
        let (status, body) = get(state(), &format!("/wallet/{}/balance", STON)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], STON);
        assert_eq!(body["balance"], "1.5");
        assert_eq!(body["display"], "1.5000");
    }

    #[tokio::test]
    async fn test_balance_invalid_address() {
        let (status, body) = get(state(), "/wallet/not-an-address/balance").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_address");
    }
}
