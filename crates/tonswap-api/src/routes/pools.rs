//! Pool information passthrough

use axum::extract::{Query, State};
use axum::Json;

use crate::dto::{PoolsQuery, PoolsResponse};
use crate::AppState;

/// GET /pools?token0=&token1= - DEX pool info for a pair (informational)
pub async fn get_pool_info(
    State(state): State<AppState>,
    Query(query): Query<PoolsQuery>,
) -> Json<PoolsResponse> {
    let pool = match state.dex() {
        Some(dex) => dex.get_pool_info(&query.token0, &query.token1).await,
        None => None,
    };
    Json(PoolsResponse { pool })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_pools_without_dex_client() {
        let (status, body) = get(state(), &format!("/pools?token0={}&token1={}", USDT, STON)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["pool"].is_null());
    }

    #[tokio::test]
    async fn test_pools_requires_pair() {
        let (status, _) = get(state(), "/pools?token0=x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
