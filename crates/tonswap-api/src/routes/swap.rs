//! Swap estimate and transaction build routes

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use stonfi::{build_swap_transaction, validate_slippage, DisplayEstimate, SwapForm, SwapRequest};
use tonswap_core::format::to_smallest_unit;
use tonswap_core::Token;

use super::{stonfi_error_to_api, ApiResult};
use crate::dto::{ApiError, SwapBuildApiRequest, SwapBuildApiResponse, SwapEstimateApiRequest};
use crate::AppState;

/// Create swap routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/estimate", post(estimate))
        .route("/build", post(build_swap))
}

/// POST /swap/estimate - Estimate output for display
async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<SwapEstimateApiRequest>,
) -> ApiResult<DisplayEstimate> {
    let (from, to) = resolve_pair(&state, &request.from_token, &request.to_token)?;
    let slippage = request
        .slippage
        .unwrap_or(state.config().default_slippage);

    let form = SwapForm {
        from: Some(from),
        to: Some(to),
        amount: request.amount,
        slippage,
    };

    state
        .flow()
        .estimate_for_display(&form, request.user_address.as_deref())
        .await
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiError::new(
                    "estimation_unavailable",
                    "Cannot estimate swap output. Try again.",
                )),
            )
        })
}

/// POST /swap/build - Build the TON Connect transaction for a swap
async fn build_swap(
    State(state): State<AppState>,
    Json(request): Json<SwapBuildApiRequest>,
) -> ApiResult<SwapBuildApiResponse> {
    let (from, to) = resolve_pair(&state, &request.from_token, &request.to_token)?;
    let slippage = request
        .slippage
        .unwrap_or(state.config().default_slippage);
    validate_slippage(slippage).map_err(stonfi_error_to_api)?;

    let swap_request = SwapRequest {
        from_token: from.address,
        to_token: to.address,
        amount: to_smallest_unit(&request.amount, from.decimals),
        slippage,
        user_address: request.user_address,
    };

    let result = build_swap_transaction(state.flow().context(), &swap_request)
        .await
        .map_err(stonfi_error_to_api)?;

    Ok(Json(SwapBuildApiResponse {
        transaction: result.transaction,
        summary: result.summary,
    }))
}

/// Look up both sides by address or symbol
fn resolve_pair(
    state: &AppState,
    from: &str,
    to: &str,
) -> Result<(Token, Token), (StatusCode, Json<ApiError>)> {
    let from = resolve_token(state, from)?;
    let to = resolve_token(state, to)?;
    if from == to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                "same_token",
                "Source and destination tokens must differ",
            )),
        ));
    }
    Ok((from, to))
}

fn resolve_token(state: &AppState, key: &str) -> Result<Token, (StatusCode, Json<ApiError>)> {
    let registry = state.registry();
    registry
        .by_address(key)
        .or_else(|| registry.by_symbol(key))
        .cloned()
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(
                    "unknown_token",
                    format!("Token not offered on {}: {}", registry.network, key),
                )),
            )
        })
}
