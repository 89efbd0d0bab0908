//! Transaction confirmation routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use stonfi::{poll_latest_transaction_url, PollOptions};
use ton_tx::TonAddress;

use super::ApiResult;
use crate::dto::{ApiError, TxHashRequest, TxHashResponse, TxLatestQuery, TxLatestResponse};
use crate::AppState;

/// Create transaction routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/latest/:address", get(latest_transaction))
        .route("/hash", post(transaction_hash))
}

/// GET /tx/latest/:address - Wait for the account's newest transaction.
///
/// Long-polls the indexer for a bounded time, then falls back to the
/// account's explorer page.
async fn latest_transaction(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<TxLatestQuery>,
) -> ApiResult<TxLatestResponse> {
    TonAddress::parse(&address).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("invalid_address", e.to_string())),
        )
    })?;

    let flow = state.flow();
    let options = PollOptions::default().with_baseline(query.baseline);

    let found =
        poll_latest_transaction_url(flow.indexer(), flow.network(), &address, &options).await;

    Ok(Json(TxLatestResponse {
        found: found.is_some(),
        explorer_url: found.unwrap_or_else(|| flow.network().account_url(&address)),
        address,
    }))
}

/// POST /tx/hash - Hash of the BoC a wallet returned after sending
async fn transaction_hash(Json(request): Json<TxHashRequest>) -> ApiResult<TxHashResponse> {
    let hash = ton_tx::transaction_hash(&request.boc).map_err(|e| {
        tracing::warn!(error = %e, "Unparseable wallet BoC");
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("invalid_boc", e.to_string())),
        )
    })?;

    Ok(Json(TxHashResponse { hash }))
}
