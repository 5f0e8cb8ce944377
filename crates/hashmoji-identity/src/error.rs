//! # Identity Errors
//!
//! Error types for identity and proof operations.

use thiserror::Error;

/// Errors that can occur while talking to the identity authority.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The authority answered with a non-2xx status.
    #[error("authority error: {status} - {message}")]
    Protocol {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response format: {0}")]
    Decode(String),

    /// A proof sequence contains a symbol outside the alphabet.
    #[error("unknown symbol '{symbol}' at position {position}")]
    UnknownSymbol {
        /// The offending symbol.
        symbol: char,
        /// Zero-based position in the sequence.
        position: usize,
    },

    /// The caller supplied nothing usable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation needs stored keys and there are none.
    #[error("no identity registered on this device")]
    NotRegistered,

    /// The biometric gate refused access to a secret.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The credential store failed.
    #[error("credential store error: {0}")]
    Store(String),
}

impl IdentityError {
    /// Returns the HTTP status code if the authority rejected the request.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns whether this error is a 404 from the authority.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<hashmoji_core::CoreError> for IdentityError {
    fn from(err: hashmoji_core::CoreError) -> Self {
        match err {
            hashmoji_core::CoreError::UnknownSymbol { symbol, position } => {
                Self::UnknownSymbol { symbol, position }
            }
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<keyring::Error> for IdentityError {
    fn from(err: keyring::Error) -> Self {
        Self::Store(err.to_string())
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
