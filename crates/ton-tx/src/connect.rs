//! TON Connect transaction structures
//!
//! Defines the JSON shape wallets accept for `sendTransaction` and the
//! capability the rest of the workspace uses to talk to a connected wallet.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::boc::{self, BocError};

/// Message shown when the user declines the signing request
pub const USER_REJECTED_MESSAGE: &str = "Transaction rejected by user";

/// A single outbound internal message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Destination (router or the sender's jetton wallet)
    pub address: String,
    /// Attached value in nanotons, as a decimal string
    pub amount: String,
    /// Base64 BoC of the message body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Request handed to the wallet for signing and broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
    /// Unix seconds after which the wallet must refuse to sign
    pub valid_until: u64,
    /// Chain id ("-239" mainnet, "-3" testnet)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub messages: Vec<OutboundMessage>,
}

impl TransactionDescriptor {
    pub fn new(valid_until: u64, messages: Vec<OutboundMessage>) -> Self {
        Self {
            valid_until,
            network: None,
            messages,
        }
    }

    pub fn with_network(mut self, chain_id: impl Into<String>) -> Self {
        self.network = Some(chain_id.into());
        self
    }

    pub fn is_expired_at(&self, unix_secs: u64) -> bool {
        unix_secs >= self.valid_until
    }
}

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// What the wallet returns after broadcasting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendTransactionResult {
    /// Base64 BoC of the signed external message
    pub boc: String,
}

impl SendTransactionResult {
    /// Hex hash of the signed message, usable as an explorer lookup key
    pub fn message_hash(&self) -> Result<String, BocError> {
        transaction_hash(&self.boc)
    }
}

/// Root cell hash of a base64 BoC
pub fn transaction_hash(boc_base64: &str) -> Result<String, BocError> {
    Ok(boc::parse_base64(boc_base64)?.hash_hex())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected {
        address: String,
    },
}

impl ConnectionState {
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Connected { address } => Some(address),
            _ => None,
        }
    }
}

/// Capability for the wallet the user has connected
///
/// Signing happens inside the wallet; implementations only relay requests.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Open the connection flow; resolves with the connected address
    async fn connect(&self) -> Result<String, WalletError>;

    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Subscribe to connection state changes
    fn state(&self) -> watch::Receiver<ConnectionState>;

    fn current_address(&self) -> Option<String> {
        self.state().borrow().address().map(str::to_string)
    }

    async fn send_transaction(
        &self,
        tx: &TransactionDescriptor,
    ) -> Result<SendTransactionResult, WalletError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("{}", USER_REJECTED_MESSAGE)]
    Rejected,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("{0}")]
    Other(String),
}

const REJECTION_REGEX: &str = r"(?i)reject|cancel|denied";
static REJECTION_LOCK: OnceLock<Regex> = OnceLock::new();

fn rejection_pattern() -> &'static Regex {
    REJECTION_LOCK.get_or_init(|| Regex::new(REJECTION_REGEX).unwrap())
}

/// Map a raw wallet error message onto [`WalletError`]
pub fn normalize_wallet_error(message: &str) -> WalletError {
    if rejection_pattern().is_match(message) {
        WalletError::Rejected
    } else {
        WalletError::Other(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn test_descriptor_json_shape() {
        let tx = TransactionDescriptor::new(
            1_700_000_600,
            vec![OutboundMessage {
                address: "EQB3ncyBUTjZUA5EnFKR5_EnOMI9V1tTEAAPaiU71gc4TiUt".into(),
                amount: "1000000000".into(),
                payload: Some("te6cckEBAQEAAgAAAEysuc0=".into()),
            }],
        )
        .with_network("-239");

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["validUntil"], 1_700_000_600u64);
        assert_eq!(json["network"], "-239");
        assert_eq!(json["messages"][0]["amount"], "1000000000");
        assert_eq!(json["messages"][0]["payload"], "te6cckEBAQEAAgAAAEysuc0=");
    }

    #[test]
    fn test_descriptor_omits_missing_fields() {
        let tx = TransactionDescriptor::new(
            10,
            vec![OutboundMessage {
                address: "EQ".into(),
                amount: "1".into(),
                payload: None,
            }],
        );
        let json = serde_json::to_string(&tx).unwrap();
        assert!(!json.contains("network"));
        assert!(!json.contains("payload"));
        assert!(tx.is_expired_at(10));
        assert!(!tx.is_expired_at(9));
    }

    #[test]
    fn test_normalize_wallet_error() {
        assert_eq!(
            normalize_wallet_error("User Rejected the request"),
            WalletError::Rejected
        );
        assert_eq!(normalize_wallet_error("Operation CANCELLED"), WalletError::Rejected);
        assert_eq!(normalize_wallet_error("permission denied"), WalletError::Rejected);
        assert_eq!(
            normalize_wallet_error("network timeout"),
            WalletError::Other("network timeout".into())
        );
        assert_eq!(WalletError::Rejected.to_string(), USER_REJECTED_MESSAGE);
    }

    #[test]
    fn test_message_hash_from_boc() {
        let result = SendTransactionResult {
            boc: Cell::empty().to_boc_base64(),
        };
        assert_eq!(result.message_hash().unwrap(), Cell::empty().hash_hex());
        assert!(transaction_hash("garbage").is_err());
    }

    #[test]
    fn test_connection_state_address() {
        assert_eq!(ConnectionState::Disconnected.address(), None);
        let connected = ConnectionState::Connected {
            address: "EQabc".into(),
        };
        assert_eq!(connected.address(), Some("EQabc"));
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2023-01-01
        assert!(unix_now() > 1_672_531_200);
    }
}
