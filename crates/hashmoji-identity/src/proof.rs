//! Time-boxed identity proofs.

use chrono::{DateTime, Duration as TimeDelta, Utc};
use std::time::Duration;

use hashmoji_core::{codec, hex_decode, SymbolAlphabet};

use crate::error::{IdentityError, IdentityResult};

/// How long a proof stays valid after creation, in seconds.
pub const PROOF_VALIDITY_SECS: i64 = 300;

/// Emoji presentation selector, commonly appended by keyboards.
const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// A proof of key possession, minted by the authority.
///
/// The authority enforces expiry; [`ProofToken::remaining`] only mirrors it
/// for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofToken {
    /// The proof payload as display symbols.
    pub symbols: String,
    /// The proof payload as the authority's hex string.
    pub hex: String,
    /// When this client received the proof.
    pub issued_at: DateTime<Utc>,
}

impl ProofToken {
    /// Builds a token from the authority's hex payload.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Decode`] if the payload is not hex.
    pub fn from_hex(
        hex: impl Into<String>,
        alphabet: &SymbolAlphabet,
        issued_at: DateTime<Utc>,
    ) -> IdentityResult<Self> {
        let hex = hex.into();
        let symbols = codec::hex_to_symbols(&hex, alphabet)
            .map_err(|e| IdentityError::Decode(format!("proof payload: {e}")))?;
        Ok(Self {
            symbols,
            hex,
            issued_at,
        })
    }

    /// Returns when the proof stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + TimeDelta::seconds(PROOF_VALIDITY_SECS)
    }

    /// Returns the time left at `now`, saturating at zero.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at() - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// Returns whether the proof has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// A proof presented for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofInput {
    /// Display symbols, as shown by the proof creator.
    Symbols(String),
    /// The hex payload.
    Hex(String),
}

impl ProofInput {
    /// Classifies raw user text.
    ///
    /// Text made only of ASCII hex digits and whitespace is hex, with the
    /// whitespace removed; anything else is treated as symbols.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidInput`] for blank input.
    pub fn parse(raw: &str) -> IdentityResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::InvalidInput(
                "proof sequence is empty".to_string(),
            ));
        }
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self::Hex(compact))
        } else {
            Ok(Self::Symbols(trimmed.to_string()))
        }
    }

    /// Converts the input to the hex string the authority expects.
    ///
    /// Whitespace and emoji presentation selectors inside a symbol sequence
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::UnknownSymbol`] if a symbol is not in the
    /// alphabet, or [`IdentityError::InvalidInput`] if hex input is malformed
    /// or nothing remains after cleanup.
    pub fn to_wire_hex(&self, alphabet: &SymbolAlphabet) -> IdentityResult<String> {
        match self {
            Self::Symbols(symbols) => {
                let cleaned: String = symbols
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != VARIATION_SELECTOR_16)
                    .collect();
                if cleaned.is_empty() {
                    return Err(IdentityError::InvalidInput(
                        "proof sequence is empty".to_string(),
                    ));
                }
                Ok(codec::symbols_to_hex(&cleaned, alphabet)?)
            }
            Self::Hex(hex) => {
                hex_decode(hex)?;
                Ok(hex.clone())
            }
        }
    }
}
