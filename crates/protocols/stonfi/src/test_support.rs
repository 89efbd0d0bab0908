//! Hand-written indexer double shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tonapi_client::{AccountRef, Indexer, JettonBalance, JettonPreview, JettonWallet};
use tonswap_core::IndexerError;

pub const NATIVE: &str = "EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c";
pub const USDT: &str = "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs";
pub const USDT_RAW: &str = "0:b113a994b5024a16719f69139328eb759596c38a25f59028b146fecdc3621dfe";
pub const STON: &str = "EQA2kCVNwVsil2EM2mB0SkXytxCqQjS4mttjDpnXmwG9T6bO";
pub const ROUTER: &str = "EQB3ncyBUTjZUA5EnFKR5_EnOMI9V1tTEAAPaiU71gc4TiUt";

/// What a mocked call should answer
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16),
    Unreachable,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T, IndexerError> {
        match self {
            Self::Ok(v) => Ok(v.clone()),
            Self::Status(status) => Err(IndexerError::ApiError {
                status: *status,
                message: "mock".to_string(),
            }),
            Self::Unreachable => Err(IndexerError::Unreachable {
                url: "mock://indexer".to_string(),
            }),
        }
    }
}

pub struct MockIndexer {
    pub balance: Reply<u64>,
    pub wallets: Reply<Vec<JettonWallet>>,
    pub balances: Reply<Vec<JettonBalance>>,
    /// Answers for successive `latest_event_id` calls; the last one repeats
    pub events: Mutex<Vec<Reply<Option<String>>>>,
    /// How long each `latest_event_id` call takes to answer
    pub event_delay: Duration,
    pub event_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
}

impl Default for MockIndexer {
    fn default() -> Self {
        Self {
            balance: Reply::Ok(0),
            wallets: Reply::Ok(Vec::new()),
            balances: Reply::Ok(Vec::new()),
            events: Mutex::new(vec![Reply::Ok(None)]),
            event_delay: Duration::ZERO,
            event_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
        }
    }
}

impl MockIndexer {
    pub fn with_events(events: Vec<Reply<Option<String>>>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    pub fn event_calls(&self) -> usize {
        self.event_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }
}

pub fn wallet(address: &str) -> JettonWallet {
    JettonWallet {
        address: address.to_string(),
        owner: None,
        jetton: None,
        balance: None,
    }
}

pub fn balance_entry(jetton: &str, wallet: &str) -> JettonBalance {
    JettonBalance {
        balance: "1000".to_string(),
        wallet_address: AccountRef {
            address: wallet.to_string(),
        },
        jetton: JettonPreview {
            address: jetton.to_string(),
            name: None,
            symbol: None,
            decimals: None,
        },
    }
}

#[async_trait]
impl Indexer for MockIndexer {
    async fn account_balance(&self, _address: &str) -> Result<u64, IndexerError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance.get()
    }

    async fn latest_event_id(&self, _address: &str) -> Result<Option<String>, IndexerError> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        if !self.event_delay.is_zero() {
            tokio::time::sleep(self.event_delay).await;
        }
        let mut events = self.events.lock().unwrap();
        let reply = if events.len() > 1 {
            events.remove(0)
        } else {
            events[0].clone()
        };
        reply.get()
    }

    async fn jetton_balances(
        &self,
        _owner: &str,
        _limit: u32,
    ) -> Result<Vec<JettonBalance>, IndexerError> {
        self.balances.get()
    }

    async fn jetton_wallets(
        &self,
        _owner: &str,
        _jetton: &str,
    ) -> Result<Vec<JettonWallet>, IndexerError> {
        self.wallets.get()
    }
}
