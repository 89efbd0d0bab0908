//! Token registry endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::dto::{TokensQuery, TokensResponse};
use crate::AppState;

/// Create token routes
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_tokens))
}

/// GET /tokens - Tokens offered on the configured network.
///
/// `?exclude=<address or symbol>` drops the token picked on the other side.
async fn list_tokens(
    State(state): State<AppState>,
    Query(query): Query<TokensQuery>,
) -> Json<TokensResponse> {
    let registry = state.registry();
    let excluded = query
        .exclude
        .as_deref()
        .and_then(|key| registry.by_address(key).or_else(|| registry.by_symbol(key)));

    let tokens: Vec<_> = registry.excluding(excluded).into_iter().cloned().collect();
    Json(TokensResponse {
        network: registry.network,
        count: tokens.len(),
        tokens,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_list_tokens() {
        let (status, body) = get(state(), "/tokens").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["network"], "mainnet");
        let count = body["count"].as_u64().unwrap();
        assert!(count > 1);
        assert_eq!(body["tokens"][0]["symbol"], "TON");
    }

    #[tokio::test]
    async fn test_exclude_by_symbol() {
        let (_, all) = get(state(), "/tokens").await;
        let (status, body) = get(state(), "/tokens?exclude=ton").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"].as_u64(), all["count"].as_u64().map(|c| c - 1));
        let symbols: Vec<_> = body["tokens"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["symbol"].as_str().unwrap().to_string())
            .collect();
        assert!(!symbols.contains(&"TON".to_string()));
    }
}
