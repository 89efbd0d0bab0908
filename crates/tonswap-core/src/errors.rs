//! Error types for TonSwap

use thiserror::Error;

/// Core errors that can occur in TonSwap
#[derive(Debug, Error)]
pub enum Error {
    #[error("Indexer error: {0}")]
    Indexer(#[from] IndexerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Indexer connection and query errors
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Indexer unreachable at {url}")]
    Unreachable { url: String },

    #[error("Indexer request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Indexer returned HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Result type alias for TonSwap operations
pub type Result<T> = std::result::Result<T, Error>;

impl IndexerError {
    /// Whether the indexer answered but had nothing for the request
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }
}
