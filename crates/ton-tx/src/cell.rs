//! Cell construction
//!
//! A cell holds up to 1023 data bits and up to 4 references. Builders write
//! bits most-significant first, matching the layout contracts read on-chain:
//! - `uint(n)`: big-endian, exactly `n` bits
//! - coins: `VarUInteger 16` (4-bit byte length, then the value)
//! - address: `addr_std$10 anycast:0 workchain:int8 hash:bits256`

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

use crate::address::TonAddress;

/// Maximum data bits in one cell
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum references in one cell
pub const MAX_CELL_REFS: usize = 4;

/// Deepest reference chain a cell tree may have
pub const MAX_CELL_DEPTH: u16 = 1024;

/// Largest byte length a `VarUInteger 16` can carry
const MAX_COINS_BYTES: usize = 15;

/// Immutable ordinary cell with its representation hash precomputed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    depth: u16,
    hash: [u8; 32],
}

impl Cell {
    /// Assemble a cell from raw parts. Bits past `bit_len` in `data` are ignored.
    pub fn from_parts(
        mut data: Vec<u8>,
        bit_len: usize,
        refs: Vec<Arc<Cell>>,
    ) -> Result<Self, CellError> {
        if bit_len > MAX_CELL_BITS {
            return Err(CellError::BitOverflow {
                needed: bit_len,
                available: MAX_CELL_BITS,
            });
        }
        if refs.len() > MAX_CELL_REFS {
            return Err(CellError::RefOverflow);
        }
        let byte_len = bit_len.div_ceil(8);
        if data.len() < byte_len {
            return Err(CellError::DataTooShort {
                bit_len,
                bytes: data.len(),
            });
        }
        data.truncate(byte_len);
        if bit_len % 8 != 0 {
            if let Some(last) = data.last_mut() {
                *last &= 0xffu8 << (8 - bit_len % 8);
            }
        }

        let mut depth = 0u16;
        for r in &refs {
            let child_depth = r
                .depth
                .checked_add(1)
                .filter(|d| *d <= MAX_CELL_DEPTH)
                .ok_or(CellError::DepthOverflow {
                    max: MAX_CELL_DEPTH,
                })?;
            depth = depth.max(child_depth);
        }

        let mut cell = Self {
            data,
            bit_len,
            refs,
            depth,
            hash: [0u8; 32],
        };
        cell.hash = cell.compute_hash();
        Ok(cell)
    }

    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            bit_len: 0,
            refs: Vec::new(),
            depth: 0,
            hash: Sha256::digest([0u8, 0u8]).into(),
        }
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Data bytes; trailing bits of the last byte are zero
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Representation hash (SHA-256)
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Descriptor bytes `d1` (ref count, ordinary, level 0) and `d2` (data length)
    pub(crate) fn descriptors(&self) -> [u8; 2] {
        let d1 = self.refs.len() as u8;
        let d2 = (self.bit_len.div_ceil(8) + self.bit_len / 8) as u8;
        [d1, d2]
    }

    /// Data with the completion tag appended when the length is not byte-aligned
    pub(crate) fn padded_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        let rem = self.bit_len % 8;
        if rem != 0 {
            if let Some(last) = out.last_mut() {
                *last |= 0x80 >> rem;
            }
        }
        out
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.padded_data());
        for r in &self.refs {
            hasher.update(r.depth.to_be_bytes());
        }
        for r in &self.refs {
            hasher.update(r.hash);
        }
        hasher.finalize().into()
    }

    /// Serialize as a bag of cells with CRC32C
    pub fn to_boc(&self) -> Vec<u8> {
        crate::boc::serialize(self)
    }

    /// Base64 bag of cells, the form wallets accept as message payload
    pub fn to_boc_base64(&self) -> String {
        crate::boc::serialize_base64(self)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

/// Append-only bit writer producing a [`Cell`]
#[derive(Debug, Default, Clone)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bits_used(&self) -> usize {
        self.bit_len
    }

    pub fn bits_left(&self) -> usize {
        MAX_CELL_BITS - self.bit_len
    }

    fn ensure_room(&self, bits: usize) -> Result<(), CellError> {
        if bits > self.bits_left() {
            return Err(CellError::BitOverflow {
                needed: self.bit_len + bits,
                available: MAX_CELL_BITS,
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let idx = self.data.len() - 1;
            self.data[idx] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_room(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Store `value` as an unsigned big-endian integer of exactly `bits` bits
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self, CellError> {
        if bits < 64 && value >> bits != 0 {
            return Err(CellError::ValueTooWide { bits });
        }
        if bits > 64 {
            return self.store_biguint(&BigUint::from(value), bits);
        }
        self.ensure_room(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    /// Store an arbitrary-precision unsigned integer in exactly `bits` bits
    pub fn store_biguint(&mut self, value: &BigUint, bits: usize) -> Result<&mut Self, CellError> {
        if value.bits() as usize > bits {
            return Err(CellError::ValueTooWide { bits });
        }
        self.ensure_room(bits)?;
        for i in (0..bits as u64).rev() {
            self.push_bit(value.bit(i));
        }
        Ok(self)
    }

    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_room(bytes.len() * 8)?;
        for &byte in bytes {
            for i in (0..8).rev() {
                self.push_bit((byte >> i) & 1 == 1);
            }
        }
        Ok(self)
    }

    /// Store a nanoton/jetton amount as `VarUInteger 16`
    pub fn store_coins(&mut self, amount: &BigUint) -> Result<&mut Self, CellError> {
        if amount.is_zero() {
            return self.store_uint(0, 4);
        }
        let len = (amount.bits() as usize).div_ceil(8);
        if len > MAX_COINS_BYTES {
            return Err(CellError::CoinsOverflow);
        }
        self.ensure_room(4 + len * 8)?;
        self.store_uint(len as u64, 4)?;
        self.store_biguint(amount, len * 8)
    }

    pub fn store_coins_u64(&mut self, amount: u64) -> Result<&mut Self, CellError> {
        self.store_coins(&BigUint::from(amount))
    }

    /// Store a standard internal address (267 bits)
    pub fn store_address(&mut self, address: &TonAddress) -> Result<&mut Self, CellError> {
        self.ensure_room(267)?;
        self.store_uint(0b10, 2)?;
        self.store_bit(false)?;
        self.store_uint(address.workchain as u8 as u64, 8)?;
        self.store_bytes(&address.hash)
    }

    /// Store `addr_none$00`
    pub fn store_address_none(&mut self) -> Result<&mut Self, CellError> {
        self.store_uint(0, 2)
    }

    pub fn store_ref(&mut self, cell: impl Into<Arc<Cell>>) -> Result<&mut Self, CellError> {
        if self.refs.len() >= MAX_CELL_REFS {
            return Err(CellError::RefOverflow);
        }
        self.refs.push(cell.into());
        Ok(self)
    }

    pub fn build(&self) -> Result<Cell, CellError> {
        Cell::from_parts(self.data.clone(), self.bit_len, self.refs.clone())
    }
}

/// Errors raised while writing cells
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
    #[error("Cell overflow: {needed} bits needed, {available} available")]
    BitOverflow { needed: usize, available: usize },

    #[error("Cell already holds {MAX_CELL_REFS} references")]
    RefOverflow,

    #[error("Value does not fit in {bits} bits")]
    ValueTooWide { bits: usize },

    #[error("Coin amount exceeds 120 bits")]
    CoinsOverflow,

    #[error("Cell data too short: {bit_len} bits declared, {bytes} bytes given")]
    DataTooShort { bit_len: usize, bytes: usize },

    #[error("Cell tree deeper than {max}")]
    DepthOverflow { max: u16 },
}
