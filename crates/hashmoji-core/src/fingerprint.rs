//! Fingerprints: a digest shown as a short symbol sequence plus full hex.
//!
//! Verification never trusts a supplied digest. The input bytes are hashed
//! again and the fresh fingerprint is compared with whatever the user
//! provided.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::alphabet::SymbolAlphabet;
use crate::codec::{self, DEFAULT_SYMBOL_COUNT};
use crate::digest::Digest;
use crate::error::Result;

/// A digest in human-comparable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    /// The leading digest bytes as symbols.
    pub symbols: String,
    /// The full digest as lowercase hex.
    pub hex: String,
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbols, self.hex)
    }
}

/// Result of comparing a fresh fingerprint with user-supplied values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationOutcome {
    /// Every supplied value matches.
    Match,
    /// At least one supplied value differs.
    Mismatch,
    /// Nothing was supplied to compare against.
    Invalid,
}

impl VerificationOutcome {
    /// Returns a short human-readable description.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Match => "Hash verified successfully",
            Self::Mismatch => "Hash verification failed",
            Self::Invalid => "Nothing to compare against: supply symbols or a SHA-256 hex digest",
        }
    }
}

/// Computes and checks fingerprints against an alphabet.
#[derive(Debug, Clone, Copy)]
pub struct FingerprintService<'a> {
    alphabet: &'a SymbolAlphabet,
    symbol_count: usize,
}

impl Default for FingerprintService<'static> {
    fn default() -> Self {
        Self::new(SymbolAlphabet::global())
    }
}

impl<'a> FingerprintService<'a> {
    /// Creates a service over `alphabet` showing four symbols.
    #[must_use]
    pub fn new(alphabet: &'a SymbolAlphabet) -> Self {
        Self {
            alphabet,
            symbol_count: DEFAULT_SYMBOL_COUNT,
        }
    }

    /// Overrides the number of symbols shown.
    #[must_use]
    pub fn with_symbol_count(mut self, count: usize) -> Self {
        self.symbol_count = count;
        self
    }

    /// Returns the alphabet in use.
    #[must_use]
    pub fn alphabet(&self) -> &'a SymbolAlphabet {
        self.alphabet
    }

    /// Fingerprints raw bytes.
    #[must_use]
    pub fn fingerprint_of(&self, bytes: &[u8]) -> Fingerprint {
        let digest = Digest::compute(bytes);
        Fingerprint {
            symbols: codec::encode(digest.as_bytes(), self.alphabet, self.symbol_count),
            hex: digest.to_hex(),
        }
    }

    /// Fingerprints the UTF-8 bytes of `text`.
    #[must_use]
    pub fn fingerprint_text(&self, text: &str) -> Fingerprint {
        self.fingerprint_of(text.as_bytes())
    }

    /// Fingerprints the full contents of a file.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`](crate::CoreError::Io) if the file cannot be read.
    pub fn fingerprint_file(&self, path: impl AsRef<Path>) -> Result<Fingerprint> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Fingerprinting file");
        Ok(self.fingerprint_of(&data))
    }

    /// Recomputes the fingerprint of `bytes` and compares it with the
    /// supplied symbols and/or hex digest.
    ///
    /// Supplied values are trimmed; blank values count as absent. Hex is
    /// compared case-insensitively, symbols exactly. When both are supplied,
    /// both must match.
    #[must_use]
    pub fn verify(
        &self,
        bytes: &[u8],
        expected_symbols: Option<&str>,
        expected_hex: Option<&str>,
    ) -> VerificationOutcome {
        let expected_symbols = expected_symbols.map(str::trim).filter(|s| !s.is_empty());
        let expected_hex = expected_hex.map(str::trim).filter(|s| !s.is_empty());

        if expected_symbols.is_none() && expected_hex.is_none() {
            return VerificationOutcome::Invalid;
        }

        let actual = self.fingerprint_of(bytes);
        let symbols_ok = expected_symbols.map_or(true, |s| s == actual.symbols);
        let hex_ok = expected_hex.map_or(true, |h| h.eq_ignore_ascii_case(&actual.hex));

        let outcome = if symbols_ok && hex_ok {
            VerificationOutcome::Match
        } else {
            VerificationOutcome::Mismatch
        };
        tracing::debug!(?outcome, symbols_ok, hex_ok, "Verified fingerprint");
        outcome
    }
}
