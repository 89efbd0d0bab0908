//! Swap Transaction Builder
//!
//! Builds TON Connect transactions for STON.fi router v1 swaps.
//!
//! # Message Structure
//!
//! Native TON -> jetton: one message to the router
//!   value   = swap amount
//!   payload = swap cell
//!
//! Jetton -> jetton/TON: one message to the sender's jetton wallet
//!   value   = 0.3 TON gas
//!   payload = jetton transfer, forward payload (ref) = swap cell
//!
//! The swap cell is
//! `op:u32 | ask_token:MsgAddress | min_out:Coins | receiver:MsgAddress`.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use ton_tx::{
    unix_now, Cell, CellBuilder, CellError, OutboundMessage, TonAddress, TransactionDescriptor,
};
use tonapi_client::Indexer;
use tonswap_core::constants::NATIVE_PSEUDO_ADDRESS;
use tonswap_core::NetworkConfig;

use crate::constants::{gas, ops, TX_VALIDITY_SECS};
use crate::custody::resolve_custody_address;
use crate::estimator::SwapEstimator;
use crate::state::{StonfiError, SwapEstimate, SwapRequest};

// =============================================================================
// Public Types
// =============================================================================

/// Everything a build needs besides the request
#[derive(Clone, Copy)]
pub struct SwapContext<'a> {
    pub network: &'a NetworkConfig,
    pub estimator: &'a dyn SwapEstimator,
    pub indexer: &'a dyn Indexer,
}

/// Which encoding path a swap takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapPath {
    /// Native TON sent straight to the router
    NativeToJetton,
    /// Jetton transfer through the sender's jetton wallet
    JettonTransfer,
}

/// Build result containing the wallet request and a summary
#[derive(Debug, Clone)]
pub struct SwapBuildResult {
    pub transaction: TransactionDescriptor,
    pub summary: SwapTxSummary,
}

/// Summary of the swap transaction for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapTxSummary {
    pub path: SwapPath,
    pub input_amount: String,
    pub input_token: String,
    pub expected_output: String,
    pub min_output: String,
    pub output_token: String,
    /// Message destination (router or jetton wallet)
    pub destination: String,
    /// Nanotons attached to the message
    pub attached_value: String,
    pub valid_until: u64,
}

// =============================================================================
// Main Builder Function
// =============================================================================

/// Build a swap transaction. Always re-estimates so `min_output` reflects
/// the current quote.
pub async fn build_swap_transaction(
    ctx: SwapContext<'_>,
    request: &SwapRequest,
) -> Result<SwapBuildResult, StonfiError> {
    build_swap_transaction_at(ctx, request, unix_now()).await
}

/// [`build_swap_transaction`] with an explicit clock
pub async fn build_swap_transaction_at(
    ctx: SwapContext<'_>,
    request: &SwapRequest,
    now: u64,
) -> Result<SwapBuildResult, StonfiError> {
    if request.amount.is_zero() {
        return Err(StonfiError::InvalidAmount("amount must be positive".to_string()));
    }

    let ask_token = parse_address(&request.to_token)?;
    let user = parse_address(&request.user_address)?;
    let offer = parse_address(&request.from_token)?;

    let estimate = ctx.estimator.estimate(request).await?;
    let swap_payload = build_swap_payload(&ask_token, &estimate.min_output, &user)?;
    let valid_until = now + TX_VALIDITY_SECS;
    let testnet = ctx.network.is_testnet();

    let (path, message) = if is_native(&offer) {
        let message = OutboundMessage {
            address: ctx.network.router_address.clone(),
            amount: request.amount.to_string(),
            payload: Some(swap_payload.to_boc_base64()),
        };
        (SwapPath::NativeToJetton, message)
    } else {
        let jetton_wallet =
            resolve_custody_address(ctx.indexer, &request.user_address, &request.from_token)
                .await?
                .ok_or_else(|| StonfiError::JettonWalletNotFound {
                    owner: request.user_address.clone(),
                    jetton: request.from_token.clone(),
                })?;
        let jetton_wallet = parse_address(&jetton_wallet)?;
        let router = parse_address(&ctx.network.router_address)?;

        let transfer = build_jetton_transfer_payload(
            &request.amount,
            &router,
            &user,
            &BigUint::from(gas::FORWARD_TON_AMOUNT),
            swap_payload,
        )?;
        let message = OutboundMessage {
            address: jetton_wallet.to_friendly(true, testnet),
            amount: gas::JETTON_SWAP_GAS.to_string(),
            payload: Some(transfer.to_boc_base64()),
        };
        (SwapPath::JettonTransfer, message)
    };

    tracing::info!(
        path = ?path,
        from = %request.from_token,
        to = %request.to_token,
        amount = %request.amount,
        min_output = %estimate.min_output,
        destination = %message.address,
        "Built swap transaction"
    );

    let summary = summarize(path, request, &estimate, &message, valid_until);
    let transaction = TransactionDescriptor::new(valid_until, vec![message])
        .with_network(ctx.network.network.chain_id());

    Ok(SwapBuildResult {
        transaction,
        summary,
    })
}

// =============================================================================
// Payload Cells
// =============================================================================

/// Router swap request
pub fn build_swap_payload(
    ask_token: &TonAddress,
    min_output: &BigUint,
    receiver: &TonAddress,
) -> Result<Cell, CellError> {
    let mut builder = CellBuilder::new();
    builder
        .store_uint(ops::SWAP as u64, 32)?
        .store_address(ask_token)?
        .store_coins(min_output)?
        .store_address(receiver)?;
    builder.build()
}

/// TEP-74 jetton transfer carrying `forward_payload` by reference
pub fn build_jetton_transfer_payload(
    amount: &BigUint,
    destination: &TonAddress,
    response_destination: &TonAddress,
    forward_ton_amount: &BigUint,
    forward_payload: Cell,
) -> Result<Cell, CellError> {
    let mut builder = CellBuilder::new();
    builder
        .store_uint(ops::JETTON_TRANSFER as u64, 32)?
        .store_uint(ops::QUERY_ID, 64)?
        .store_coins(amount)?
        .store_address(destination)?
        .store_address(response_destination)?
        // no custom payload
        .store_bit(false)?
        .store_coins(forward_ton_amount)?
        // forward payload in ref
        .store_bit(true)?
        .store_ref(forward_payload)?;
    builder.build()
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_address(address: &str) -> Result<TonAddress, StonfiError> {
    TonAddress::parse(address).map_err(|e| StonfiError::InvalidAddress(format!("{address}: {e}")))
}

fn is_native(address: &TonAddress) -> bool {
    TonAddress::parse(NATIVE_PSEUDO_ADDRESS)
        .map(|native| native.same_account(address))
        .unwrap_or(false)
}

fn summarize(
    path: SwapPath,
    request: &SwapRequest,
    estimate: &SwapEstimate,
    message: &OutboundMessage,
    valid_until: u64,
) -> SwapTxSummary {
    SwapTxSummary {
        path,
        input_amount: request.amount.to_string(),
        input_token: request.from_token.clone(),
        expected_output: estimate.expected_output.to_string(),
        min_output: estimate.min_output.to_string(),
        output_token: request.to_token.clone(),
        destination: message.address.clone(),
        attached_value: message.amount.clone(),
        valid_until,
    }
}
