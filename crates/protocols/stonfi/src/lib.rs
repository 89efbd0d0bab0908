//! STON.fi Protocol Implementation
//!
//! This crate implements swaps through the STON.fi router: output
//! estimation, jetton wallet resolution, payload construction for
//! TON Connect and confirmation polling.

pub mod confirmation;
pub mod constants;
pub mod custody;
pub mod estimator;
pub mod flow;
pub mod state;
pub mod tx_builder;

#[cfg(test)]
mod test_support;

// Re-exports
pub use confirmation::{poll_latest_transaction_url, PollOptions};
pub use constants::{gas, ops, JETTON_PAGE_LIMIT, TX_VALIDITY_SECS};
pub use custody::resolve_custody_address;
pub use estimator::{FixedRateEstimator, SwapEstimator};
pub use flow::{DisplayEstimate, SwapFlow, SwapFlowError, SwapForm, SwapOutcome, WalletBalance};
pub use state::{apply_slippage, validate_slippage, StonfiError, SwapEstimate, SwapRequest};
pub use tx_builder::{
    build_jetton_transfer_payload, build_swap_payload, build_swap_transaction,
    build_swap_transaction_at, SwapBuildResult, SwapContext, SwapPath, SwapTxSummary,
};
