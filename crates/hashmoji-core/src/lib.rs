//! # Hashmoji Core
//!
//! Content fingerprints rendered as short emoji sequences.
//!
//! A fingerprint is the SHA-256 digest of some bytes shown two ways: the
//! first four digest bytes mapped through an emoji alphabet (quick to
//! compare by eye) and the full lowercase hex digest (for high-assurance
//! comparison).
//!
//! ## Example
//!
//! ```rust
//! use hashmoji_core::{FingerprintService, VerificationOutcome};
//!
//! let service = FingerprintService::default();
//! let fp = service.fingerprint_text("hello");
//! assert_eq!(fp.symbols.chars().count(), 4);
//!
//! let outcome = service.verify(b"hello", Some(fp.symbols.as_str()), None);
//! assert_eq!(outcome, VerificationOutcome::Match);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alphabet;
pub mod codec;
mod digest;
mod error;
mod fingerprint;

pub use alphabet::{SymbolAlphabet, SYMBOL_RANGES};
pub use codec::DEFAULT_SYMBOL_COUNT;
pub use digest::{hex_decode, hex_encode, Digest};
pub use error::{CoreError, Result};
pub use fingerprint::{Fingerprint, FingerprintService, VerificationOutcome};
