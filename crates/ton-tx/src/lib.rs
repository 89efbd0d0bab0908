//! ton-tx: Transaction building utilities for TON
//!
//! Provides address parsing, cell encoding, bag-of-cells serialization and
//! the TON Connect structures wallets sign.

pub mod address;
pub mod boc;
pub mod cell;
pub mod connect;

pub use address::{addresses_match, AddressError, TonAddress};
pub use boc::{parse_base64, BocError};
pub use cell::{Cell, CellBuilder, CellError, MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};
pub use connect::*;
