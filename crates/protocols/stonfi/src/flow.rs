//! Swap submission flow
//!
//! What the swap button does: validate the form, build the transaction,
//! hand it to the wallet, then look for the resulting transaction.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ton_tx::{
    normalize_wallet_error, TransactionDescriptor, WalletConnector, WalletError,
    USER_REJECTED_MESSAGE,
};
use tonapi_client::Indexer;
use tonswap_core::constants::TON_DECIMALS;
use tonswap_core::format::{
    format_address, format_balance, from_smallest_unit, to_smallest_unit,
};
use tonswap_core::{NetworkConfig, Token};

use crate::confirmation::{poll_latest_transaction_url, PollOptions};
use crate::estimator::SwapEstimator;
use crate::state::{StonfiError, SwapRequest};
use crate::tx_builder::{build_swap_transaction, SwapContext, SwapTxSummary};

/// User input of the swap form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwapForm {
    pub from: Option<Token>,
    pub to: Option<Token>,
    /// Decimal amount as typed, in `from` units
    pub amount: String,
    /// Slippage tolerance in percent
    pub slippage: f64,
}

/// Estimate formatted in token units for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayEstimate {
    pub expected_output: String,
    pub min_output: String,
    pub exchange_rate: f64,
    pub price_impact: f64,
}

/// Native balance of a wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletBalance {
    pub address: String,
    /// Shortened address for the wallet button
    pub short_address: String,
    /// Balance in TON, trailing zeros trimmed
    pub balance: String,
    /// Balance with four fractional digits
    pub display: String,
}

/// Result of a submitted swap
#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub transaction: TransactionDescriptor,
    pub summary: SwapTxSummary,
    /// Hash of the signed message, when the wallet's BoC parses
    pub tx_hash: Option<String>,
    /// Transaction page, or the account page when none was found in time
    pub explorer_url: String,
}

#[derive(Debug, Error)]
pub enum SwapFlowError {
    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("Please fill in all fields")]
    IncompleteForm,

    #[error("Cannot estimate swap output. Try again.")]
    EstimateUnavailable,

    #[error("{0}")]
    Build(#[from] StonfiError),

    #[error("{}", USER_REJECTED_MESSAGE)]
    Rejected,

    #[error("{0}")]
    Wallet(String),
}

impl From<WalletError> for SwapFlowError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Rejected => Self::Rejected,
            WalletError::NotConnected => Self::NotConnected,
            WalletError::Other(message) => match normalize_wallet_error(&message) {
                WalletError::Rejected => Self::Rejected,
                _ => Self::Wallet(message),
            },
        }
    }
}

/// Swap pipeline bound to one network
#[derive(Clone)]
pub struct SwapFlow {
    network: NetworkConfig,
    indexer: Arc<dyn Indexer>,
    estimator: Arc<dyn SwapEstimator>,
    poll: PollOptions,
}

impl SwapFlow {
    pub fn new(
        network: NetworkConfig,
        indexer: Arc<dyn Indexer>,
        estimator: Arc<dyn SwapEstimator>,
    ) -> Self {
        Self {
            network,
            indexer,
            estimator,
            poll: PollOptions::default(),
        }
    }

    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn indexer(&self) -> &dyn Indexer {
        self.indexer.as_ref()
    }

    pub fn context(&self) -> SwapContext<'_> {
        SwapContext {
            network: &self.network,
            estimator: self.estimator.as_ref(),
            indexer: self.indexer.as_ref(),
        }
    }

    /// Native balance; indexer failures degrade to zero
    pub async fn wallet_balance(&self, address: &str) -> WalletBalance {
        let balance = match self.indexer.account_balance(address).await {
            Ok(nanotons) => from_smallest_unit(&BigUint::from(nanotons), TON_DECIMALS),
            Err(e) => {
                tracing::warn!(address, error = %e, "Failed to fetch balance");
                "0".to_string()
            }
        };
        WalletBalance {
            address: address.to_string(),
            short_address: format_address(address),
            display: format_balance(&balance),
            balance,
        }
    }

    /// Estimate for the output field while the user types.
    ///
    /// `None` whenever no estimate is available; the output field is cleared.
    pub async fn estimate_for_display(
        &self,
        form: &SwapForm,
        user_address: Option<&str>,
    ) -> Option<DisplayEstimate> {
        let (from, to) = (form.from.as_ref()?, form.to.as_ref()?);
        let amount = to_smallest_unit(&form.amount, from.decimals);
        if amount.is_zero() {
            return None;
        }

        let request = SwapRequest {
            from_token: from.address.clone(),
            to_token: to.address.clone(),
            amount,
            slippage: form.slippage,
            user_address: user_address.unwrap_or_default().to_string(),
        };

        match self.estimator.estimate(&request).await {
            Ok(estimate) => Some(DisplayEstimate {
                expected_output: from_smallest_unit(&estimate.expected_output, to.decimals),
                min_output: from_smallest_unit(&estimate.min_output, to.decimals),
                exchange_rate: estimate.exchange_rate,
                price_impact: estimate.price_impact,
            }),
            Err(e) => {
                tracing::warn!(from = %from.symbol, to = %to.symbol, error = %e, "Estimation failed");
                None
            }
        }
    }

    /// Validate, build, sign through the wallet and locate the transaction
    pub async fn submit_swap(
        &self,
        wallet: &dyn WalletConnector,
        form: &SwapForm,
    ) -> Result<SwapOutcome, SwapFlowError> {
        let address = wallet.current_address().ok_or(SwapFlowError::NotConnected)?;

        let (from, to) = match (&form.from, &form.to) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(SwapFlowError::IncompleteForm),
        };
        let amount = to_smallest_unit(&form.amount, from.decimals);
        if amount.is_zero() {
            return Err(SwapFlowError::IncompleteForm);
        }

        let preview = self.estimate_for_display(form, Some(&address)).await;
        if !preview.is_some_and(|p| p.expected_output != "0") {
            return Err(SwapFlowError::EstimateUnavailable);
        }

        let request = SwapRequest {
            from_token: from.address.clone(),
            to_token: to.address.clone(),
            amount,
            slippage: form.slippage,
            user_address: address.clone(),
        };
        let built = build_swap_transaction(self.context(), &request).await?;

        let baseline = match self.indexer.latest_event_id(&address).await {
            Ok(event_id) => event_id,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Failed to read baseline event");
                None
            }
        };

        let result = wallet.send_transaction(&built.transaction).await.map_err(|e| {
            tracing::warn!(address = %address, error = %e, "Wallet did not send transaction");
            SwapFlowError::from(e)
        })?;

        let tx_hash = match result.message_hash() {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse transaction hash");
                None
            }
        };
        tracing::info!(address = %address, tx_hash = ?tx_hash, "Transaction sent");

        let poll = self.poll.clone().with_baseline(baseline);
        let explorer_url =
            poll_latest_transaction_url(self.indexer.as_ref(), &self.network, &address, &poll)
                .await
                .unwrap_or_else(|| self.network.account_url(&address));

        Ok(SwapOutcome {
            transaction: built.transaction,
            summary: built.summary,
            tx_hash,
            explorer_url,
        })
    }
}
