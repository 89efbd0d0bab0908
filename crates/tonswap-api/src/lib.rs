//! tonswap-api: HTTP API layer for TonSwap
//!
//! Provides a RESTful API for the browser UI: token lists, balances,
//! estimates, TON Connect transaction building and confirmation lookup.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::{AppState, StateError};
