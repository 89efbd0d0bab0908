//! tonswap-core: Shared types, errors, configuration and formatting
//!
//! This crate provides the foundational types used across the TonSwap workspace.

pub mod config;
pub mod errors;
pub mod format;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
