//! Confirmation polling
//!
//! After the wallet broadcasts, polls the indexer for the account's newest
//! event and turns it into an explorer link. Best effort and bounded.

use std::time::Duration;

use tokio::time::Instant;
use tonapi_client::Indexer;
use tonswap_core::NetworkConfig;

use crate::constants::poll::{DEFAULT_INTERVAL_MS, DEFAULT_TIMEOUT_MS};

#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Delay between indexer queries
    pub interval: Duration,
    /// Event that already existed before submission; never reported
    pub skip_event_id: Option<String>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            skip_event_id: None,
        }
    }
}

impl PollOptions {
    pub fn with_baseline(mut self, event_id: Option<String>) -> Self {
        self.skip_event_id = event_id;
        self
    }
}

/// Poll until the account shows a (new) event; returns its explorer URL.
///
/// `None` after `options.timeout`; callers fall back to
/// [`NetworkConfig::account_url`].
pub async fn poll_latest_transaction_url(
    indexer: &dyn Indexer,
    network: &NetworkConfig,
    address: &str,
    options: &PollOptions,
) -> Option<String> {
    let deadline = Instant::now() + options.timeout;
    let mut attempts = 0u32;

    while Instant::now() < deadline {
        attempts += 1;
        match tokio::time::timeout_at(deadline, indexer.latest_event_id(address)).await {
            Ok(Ok(Some(event_id)))
                if options.skip_event_id.as_deref() != Some(event_id.as_str()) =>
            {
                tracing::info!(address, event_id = %event_id, attempts, "Transaction event found");
                return Some(network.transaction_url(&event_id));
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!(address, attempts, error = %e, "Failed to query latest event");
            }
            Err(_) => {
                tracing::warn!(address, attempts, "Latest event query still pending at deadline");
                break;
            }
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::sleep(options.interval.min(remaining)).await;
    }

    tracing::info!(
        address,
        attempts,
        timeout_ms = options.timeout.as_millis() as u64,
        "No transaction event before timeout"
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn options() -> PollOptions {
        PollOptions::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_found_on_first_poll() {
        let indexer = MockIndexer::with_events(vec![Reply::Ok(Some("ev1".to_string()))]);
        let network = NetworkConfig::testnet();

        let url = poll_latest_transaction_url(&indexer, &network, STON, &options()).await;
        assert_eq!(
            url.as_deref(),
            Some("https://testnet.tonviewer.com/transaction/ev1")
        );
        assert_eq!(indexer.event_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_found_after_retries_and_errors() {
        let indexer = MockIndexer::with_events(vec![
            Reply::Ok(None),
            Reply::Unreachable,
            Reply::Ok(Some("ev2".to_string())),
        ]);
        let network = NetworkConfig::mainnet();

        let started = Instant::now();
        let url = poll_latest_transaction_url(&indexer, &network, STON, &options()).await;
        assert_eq!(url.as_deref(), Some("https://tonviewer.com/transaction/ev2"));
        assert_eq!(indexer.event_calls(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(2 * DEFAULT_INTERVAL_MS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_none_within_bound() {
        let indexer = MockIndexer::default();
        let network = NetworkConfig::mainnet();
        let opts = options();

        let started = Instant::now();
        let url = poll_latest_transaction_url(&indexer, &network, STON, &opts).await;
        let elapsed = started.elapsed();

        assert!(url.is_none());
        assert!(elapsed >= opts.timeout);
        assert!(elapsed <= opts.timeout + opts.interval);
        // 0, 1.2, ..., 10.8 s
        assert_eq!(indexer.event_calls(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_event_is_skipped() {
        let indexer = MockIndexer::with_events(vec![
            Reply::Ok(Some("old".to_string())),
            Reply::Ok(Some("old".to_string())),
            Reply::Ok(Some("new".to_string())),
        ]);
        let network = NetworkConfig::mainnet();
        let opts = options().with_baseline(Some("old".to_string()));

        let url = poll_latest_transaction_url(&indexer, &network, STON, &opts).await;
        assert_eq!(url.as_deref(), Some("https://tonviewer.com/transaction/new"));
        assert_eq!(indexer.event_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_query_is_cut_at_timeout() {
        let indexer = MockIndexer {
            event_delay: Duration::from_secs(30),
            ..MockIndexer::with_events(vec![Reply::Unreachable])
        };
        let network = NetworkConfig::mainnet();
        let opts = options();

        let started = Instant::now();
        let url = poll_latest_transaction_url(&indexer, &network, STON, &opts).await;

        assert!(url.is_none());
        assert_eq!(started.elapsed(), opts.timeout);
        assert_eq!(indexer.event_calls(), 1);
    }
}
