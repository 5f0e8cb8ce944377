//! Error types for fingerprint operations.

use thiserror::Error;

/// Errors that can occur while computing, encoding or comparing fingerprints.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A symbol is not part of the alphabet.
    #[error("unknown symbol '{symbol}' at position {position}")]
    UnknownSymbol {
        /// The offending symbol.
        symbol: char,
        /// Zero-based position of the symbol in the input.
        position: usize,
    },

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The provided input was invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An I/O error occurred while reading input bytes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Creates a new invalid input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// A specialized Result type for fingerprint operations.
pub type Result<T> = std::result::Result<T, CoreError>;
