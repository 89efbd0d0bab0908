//! TON address utilities
//!
//! Accepts both address encodings seen in the wild:
//! - user-friendly: 48 chars of base64 (url-safe or standard) over
//!   `tag(1) | workchain(1) | hash(32) | crc16(2)`
//! - raw: `<workchain>:<64 hex chars>`

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TESTNET: u8 = 0x80;

/// Parsed internal address (`addr_std` without anycast)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TonAddress {
    pub workchain: i8,
    pub hash: [u8; 32],
    pub bounceable: bool,
    pub testnet: bool,
}

impl TonAddress {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self {
            workchain,
            hash,
            bounceable: true,
            testnet: false,
        }
    }

    /// Parse either a user-friendly or a raw address
    pub fn parse(address: &str) -> Result<Self, AddressError> {
        let address = address.trim();
        if address.contains(':') {
            Self::parse_raw(address)
        } else {
            Self::parse_friendly(address)
        }
    }

    /// Parse a `<workchain>:<hex>` address
    pub fn parse_raw(address: &str) -> Result<Self, AddressError> {
        let invalid = || AddressError::InvalidAddress(address.to_string());

        let (wc, hash_hex) = address.split_once(':').ok_or_else(invalid)?;
        let workchain: i8 = wc.parse().map_err(|_| invalid())?;
        let bytes = hex::decode(hash_hex).map_err(|_| invalid())?;
        let hash: [u8; 32] = bytes.try_into().map_err(|_| invalid())?;

        Ok(Self::new(workchain, hash))
    }

    /// Parse a 48-character base64 address and verify its checksum
    pub fn parse_friendly(address: &str) -> Result<Self, AddressError> {
        if address.len() != 48 {
            return Err(AddressError::InvalidLength {
                expected: 48,
                found: address.len(),
            });
        }

        let bytes = if address.contains('-') || address.contains('_') {
            URL_SAFE.decode(address)
        } else {
            STANDARD.decode(address)
        }
        .map_err(|_| AddressError::InvalidAddress(address.to_string()))?;

        if bytes.len() != 36 {
            return Err(AddressError::InvalidLength {
                expected: 36,
                found: bytes.len(),
            });
        }

        let expected = crc16(&bytes[..34]);
        let found = u16::from_be_bytes([bytes[34], bytes[35]]);
        if expected != found {
            return Err(AddressError::ChecksumMismatch { expected, found });
        }

        let mut tag = bytes[0];
        let testnet = tag & TAG_TESTNET != 0;
        if testnet {
            tag ^= TAG_TESTNET;
        }
        let bounceable = match tag {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            other => return Err(AddressError::InvalidTag(other)),
        };

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);

        Ok(Self {
            workchain: bytes[1] as i8,
            hash,
            bounceable,
            testnet,
        })
    }

    /// `<workchain>:<hex>` form, as returned by most indexers
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// User-friendly url-safe form with explicit flags
    pub fn to_friendly(&self, bounceable: bool, testnet: bool) -> String {
        let mut bytes = Vec::with_capacity(36);
        let mut tag = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if testnet {
            tag |= TAG_TESTNET;
        }
        bytes.push(tag);
        bytes.push(self.workchain as u8);
        bytes.extend_from_slice(&self.hash);
        let crc = crc16(&bytes);
        bytes.extend_from_slice(&crc.to_be_bytes());
        URL_SAFE.encode(bytes)
    }

    /// Same account regardless of the flags it was written with
    pub fn same_account(&self, other: &TonAddress) -> bool {
        self.workchain == other.workchain && self.hash == other.hash
    }
}

impl FromStr for TonAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_friendly(self.bounceable, self.testnet))
    }
}

/// Compare two address strings by account, falling back to string equality
/// when either side does not parse.
pub fn addresses_match(a: &str, b: &str) -> bool {
    match (TonAddress::parse(a), TonAddress::parse(b)) {
        (Ok(a), Ok(b)) => a.same_account(&b),
        _ => a == b,
    }
}

/// CRC16-XMODEM (poly 0x1021, init 0)
pub(crate) fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid TON address: {0}")]
    InvalidAddress(String),

    #[error("Invalid address length: expected {expected}, found {found}")]
    InvalidLength { expected: usize, found: usize },

    #[error("Address checksum mismatch: expected {expected:#06x}, found {found:#06x}")]
    ChecksumMismatch { expected: u16, found: u16 },

    #[error("Unknown address tag {0:#04x}")]
    InvalidTag(u8),
}
