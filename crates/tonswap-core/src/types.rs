//! Core type definitions for TonSwap

use serde::{Deserialize, Serialize};
use std::fmt;

use self::constants::NATIVE_PSEUDO_ADDRESS;

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }

    /// TON Connect chain identifier
    pub fn chain_id(&self) -> &'static str {
        match self {
            Self::Mainnet => "-239",
            Self::Testnet => "-3",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}

/// A swappable asset: TON itself (via the pseudo-address) or a jetton master
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    /// Jetton master address in user-friendly form
    pub address: String,
    pub decimals: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Token {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        decimals: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            address: address.into(),
            decimals,
            image: None,
        }
    }

    /// The native coin entry, addressed by the all-zero pseudo-address
    pub fn ton() -> Self {
        Self::new("TON", "Toncoin", NATIVE_PSEUDO_ADDRESS, 9)
    }

    pub fn is_native(&self) -> bool {
        self.address == NATIVE_PSEUDO_ADDRESS
    }
}

// Identity is the on-chain address; display fields never participate.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.name)
    }
}

/// Ordered, immutable list of tokens offered for one network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRegistry {
    pub network: Network,
    pub tokens: Vec<Token>,
}

impl TokenRegistry {
    /// Broad production list
    pub fn mainnet() -> Self {
        Self {
            network: Network::Mainnet,
            tokens: vec![
                Token::ton(),
                Token::new(
                    "USDT",
                    "Tether USD",
                    "EQCxE6mUtQJKFnGfaROTKOt1lZbDiiX1kCixRv7Nw2Id_sDs",
                    6,
                ),
                Token::new(
                    "STON",
                    "STON Token",
                    "EQA2kCVNwVsil2EM2mB0SkXytxCqQjS4mttjDpnXmwG9T6bO",
                    9,
                ),
            ],
        }
    }

    /// Narrow list of STON.fi test jettons
    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            tokens: vec![
                Token::ton(),
                Token::new(
                    "TestRED",
                    "TestRED",
                    "kQDLvsZol3juZyOAVG8tWsJntOxeEZWEaWCbbSjYakQpuYN5",
                    9,
                ),
                Token::new(
                    "TestBLUE",
                    "TestBLUE",
                    "kQB_TOJSB7q3-Jm1O8s0jKFtqLElZDPjATs5uJGsujcjznq3",
                    9,
                ),
            ],
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
        }
    }

    pub fn by_address(&self, address: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.address == address)
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Tokens available for one side of the pair when `exclude` is picked on the other
    pub fn excluding(&self, exclude: Option<&Token>) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|t| exclude.map_or(true, |e| e != *t))
            .collect()
    }
}

/// Nanoton amount (1 TON = 1_000_000_000 nanoton)
pub type Nanoton = u64;

/// Constants
pub mod constants {
    use super::Nanoton;

    /// 1 TON in nanoton
    pub const NANOTON_PER_TON: Nanoton = 1_000_000_000;

    /// Decimal precision of the native coin
    pub const TON_DECIMALS: u32 = 9;

    /// Pseudo-address standing in for the native coin in token lists and swap requests
    pub const NATIVE_PSEUDO_ADDRESS: &str = "EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c";
}
