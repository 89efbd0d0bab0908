//! Jetton wallet resolution
//!
//! A jetton balance lives in a per-owner "jetton wallet" contract, and
//! transfers must be sent there rather than to the jetton master.

use ton_tx::addresses_match;
use tonapi_client::Indexer;

use crate::constants::JETTON_PAGE_LIMIT;
use crate::state::StonfiError;

/// Resolve the jetton wallet `owner` holds for `jetton_master`.
///
/// Tries the direct owner+master lookup, then scans the owner's balances.
/// `Ok(None)` means the owner holds no wallet for this jetton; indexer
/// failures are returned as errors.
pub async fn resolve_custody_address(
    indexer: &dyn Indexer,
    owner: &str,
    jetton_master: &str,
) -> Result<Option<String>, StonfiError> {
    match indexer.jetton_wallets(owner, jetton_master).await {
        Ok(wallets) => {
            if let Some(wallet) = wallets.into_iter().find(|w| !w.address.is_empty()) {
                tracing::debug!(owner, jetton = jetton_master, wallet = %wallet.address, "Jetton wallet found by direct lookup");
                return Ok(Some(wallet.address));
            }
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let balances = indexer.jetton_balances(owner, JETTON_PAGE_LIMIT).await?;
    let found = balances
        .into_iter()
        .find(|b| addresses_match(&b.jetton.address, jetton_master))
        .map(|b| b.wallet_address.address)
        .filter(|address| !address.is_empty());

    match &found {
        Some(wallet) => {
            tracing::debug!(owner, jetton = jetton_master, wallet = %wallet, "Jetton wallet found in balances")
        }
        None => tracing::info!(owner, jetton = jetton_master, "Owner holds no wallet for jetton"),
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn test_direct_lookup_wins() {
        let indexer = MockIndexer {
            wallets: Reply::Ok(vec![wallet("0:aa"), wallet("0:bb")]),
            balances: Reply::Unreachable,
            ..MockIndexer::default()
        };
        let found = resolve_custody_address(&indexer, STON, USDT).await.unwrap();
        assert_eq!(found.as_deref(), Some("0:aa"));
    }

    #[tokio::test]
    async fn test_falls_back_to_balance_scan() {
        let indexer = MockIndexer {
            wallets: Reply::Ok(vec![]),
            balances: Reply::Ok(vec![
                balance_entry("0:1111111111111111111111111111111111111111111111111111111111111111", "0:cc"),
                // indexer reports masters in raw form
                balance_entry(USDT_RAW, "0:dd"),
            ]),
            ..MockIndexer::default()
        };
        let found = resolve_custody_address(&indexer, STON, USDT).await.unwrap();
        assert_eq!(found.as_deref(), Some("0:dd"));
    }

    #[tokio::test]
    async fn test_direct_lookup_not_found_falls_through() {
        let indexer = MockIndexer {
            wallets: Reply::Status(404),
            balances: Reply::Ok(vec![balance_entry(USDT, "0:ee")]),
            ..MockIndexer::default()
        };
        let found = resolve_custody_address(&indexer, STON, USDT).await.unwrap();
        assert_eq!(found.as_deref(), Some("0:ee"));
    }

    #[tokio::test]
    async fn test_not_held_is_none() {
        let indexer = MockIndexer::default();
        assert_eq!(resolve_custody_address(&indexer, STON, USDT).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_indexer_failure_propagates() {
        let indexer = MockIndexer {
            wallets: Reply::Unreachable,
            ..MockIndexer::default()
        };
        assert!(matches!(
            resolve_custody_address(&indexer, STON, USDT).await,
            Err(StonfiError::Indexer(_))
        ));

        let indexer = MockIndexer {
            balances: Reply::Status(500),
            ..MockIndexer::default()
        };
        assert!(matches!(
            resolve_custody_address(&indexer, STON, USDT).await,
            Err(StonfiError::Indexer(_))
        ));
    }
}
