//! STON.fi State Types
//!
//! Swap requests, estimates and protocol errors.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ton_tx::CellError;
use tonswap_core::IndexerError;

use crate::constants::estimator::SLIPPAGE_SCALE;

/// Swap request, built fresh for every estimate or build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Source token address (native pseudo-address for TON)
    pub from_token: String,
    /// Destination token address
    pub to_token: String,
    /// Source amount in smallest units
    #[serde(with = "biguint_string")]
    pub amount: BigUint,
    /// Slippage tolerance in percent (0..=100)
    pub slippage: f64,
    /// User wallet address (sender and receiver)
    pub user_address: String,
}

/// Result of a swap estimate. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapEstimate {
    /// Expected output in the destination token's smallest units
    #[serde(with = "biguint_string")]
    pub expected_output: BigUint,
    /// Price impact (percent)
    pub price_impact: f64,
    /// Destination units per source unit
    pub exchange_rate: f64,
    /// Expected output less slippage; the swap reverts below this
    #[serde(with = "biguint_string")]
    pub min_output: BigUint,
}

/// Check a slippage percentage is usable
pub fn validate_slippage(slippage: f64) -> Result<(), StonfiError> {
    if !slippage.is_finite() || !(0.0..=100.0).contains(&slippage) {
        return Err(StonfiError::InvalidSlippage(slippage));
    }
    Ok(())
}

/// `expected * (1 - slippage / 100)`, rounded down.
///
/// Any positive slippage strictly lowers a non-zero expected output.
pub fn apply_slippage(expected: &BigUint, slippage: f64) -> Result<BigUint, StonfiError> {
    validate_slippage(slippage)?;
    if slippage == 0.0 || expected.is_zero() {
        return Ok(expected.clone());
    }

    let units = (slippage * (SLIPPAGE_SCALE / 100) as f64)
        .round()
        .to_u64()
        .unwrap_or(SLIPPAGE_SCALE)
        .clamp(1, SLIPPAGE_SCALE);

    let scale = BigUint::from(SLIPPAGE_SCALE);
    let deduction = (expected * units + &scale - 1u32) / &scale;
    if deduction >= *expected {
        return Ok(BigUint::zero());
    }
    Ok(expected - deduction)
}

/// STON.fi protocol errors
#[derive(Debug, Error)]
pub enum StonfiError {
    #[error("Invalid slippage: {0} (expected 0..=100)")]
    InvalidSlippage(f64),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to estimate swap: {0}")]
    EstimationFailed(String),

    #[error("Jetton wallet not found for selected token. Make sure you hold this jetton.")]
    JettonWalletNotFound { owner: String, jetton: String },

    #[error("Failed to resolve jetton wallet: {0}")]
    Indexer(#[from] IndexerError),

    #[error("Failed to encode payload: {0}")]
    Encoding(#[from] CellError),
}

impl StonfiError {
    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSlippage(_) => "invalid_slippage",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidAddress(_) => "invalid_address",
            Self::EstimationFailed(_) => "estimation_failed",
            Self::JettonWalletNotFound { .. } => "jetton_wallet_not_found",
            Self::Indexer(_) => "indexer_error",
            Self::Encoding(_) => "encoding_error",
        }
    }

    /// Get HTTP status code for API responses
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSlippage(_) | Self::InvalidAmount(_) | Self::InvalidAddress(_) => 400,
            Self::JettonWalletNotFound { .. } => 404,
            Self::EstimationFailed(_) => 422,
            Self::Indexer(_) => 502,
            Self::Encoding(_) => 500,
        }
    }
}

/// Serialize arbitrary-precision amounts as decimal strings
pub(crate) mod biguint_string {
    use num_bigint::BigUint;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let raw = String::deserialize(deserializer)?;
        BigUint::parse_bytes(raw.trim().as_bytes(), 10)
            .ok_or_else(|| de::Error::custom(format!("invalid integer amount: {raw}")))
    }
}
