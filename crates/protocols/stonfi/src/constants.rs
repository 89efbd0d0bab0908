//! STON.fi Constants
//!
//! Opcodes, gas amounts and timing parameters for router v1 swaps.

/// Message opcodes (first 32 bits of the body)
pub mod ops {
    /// Router swap request, carried as the jetton transfer's forward payload
    pub const SWAP: u32 = 0x2593_8561;

    /// TEP-74 jetton transfer
    pub const JETTON_TRANSFER: u32 = 0x0f8a_7ea5;

    /// Query id used for every transfer
    pub const QUERY_ID: u64 = 0;
}

/// Native-coin amounts attached to jetton swaps (nanotons)
pub mod gas {
    /// Value sent to the user's jetton wallet (0.3 TON)
    pub const JETTON_SWAP_GAS: u64 = 300_000_000;

    /// Forwarded to the router with the transfer notification (0.25 TON)
    pub const FORWARD_TON_AMOUNT: u64 = 250_000_000;
}

/// Seconds a built transaction stays signable
pub const TX_VALIDITY_SECS: u64 = 600;

/// Page size when enumerating an owner's jetton balances
pub const JETTON_PAGE_LIMIT: u32 = 200;

/// Estimator parameters
pub mod estimator {
    /// Price impact reported by the fixed-rate strategy (percent)
    pub const FIXED_PRICE_IMPACT: f64 = 0.1;

    /// Slippage is applied in units of 1e-9 (percent * 1e7)
    pub const SLIPPAGE_SCALE: u64 = 1_000_000_000;
}

/// Confirmation polling defaults (milliseconds)
pub mod poll {
    pub const DEFAULT_TIMEOUT_MS: u64 = 12_000;
    pub const DEFAULT_INTERVAL_MS: u64 = 1_200;
}
