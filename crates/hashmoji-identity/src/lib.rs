//! # Hashmoji Identity
//!
//! Client for a remote identity authority: register an identity, prove
//! possession of it with short-lived emoji proofs, and verify proofs shown
//! by others.
//!
//! ## Overview
//!
//! - [`IdentityProtocol`] drives the flow over two boundaries: an
//!   [`IdentityAuthority`] (the remote service, [`HttpAuthority`] in
//!   production) and a [`CredentialStore`] (the OS keyring via
//!   [`KeyringCredentialStore`]).
//! - Proofs travel as hex on the wire and are shown to people as symbols
//!   from the `hashmoji-core` alphabet.
//! - [`Challenge`] implements the HMAC device-challenge login variant.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hashmoji_identity::{HttpAuthority, IdentityProtocol, KeyringCredentialStore, ProofInput};
//!
//! let authority = HttpAuthority::new("https://nichokas.hackclub.app")?;
//! let mut protocol = IdentityProtocol::new(authority, KeyringCredentialStore::default());
//! protocol.resume()?;
//!
//! let proof = protocol.create_proof().await?;
//! println!("{} (valid until {})", proof.symbols, proof.expires_at());
//!
//! let verdict = protocol.verify_proof(&ProofInput::parse(&proof.symbols)?).await?;
//! assert!(verdict.is_verified());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod authority;
mod challenge;
mod client;
mod error;
mod gate;
mod proof;
mod protocol;
mod secret;
mod store;
mod types;

pub use authority::IdentityAuthority;
pub use challenge::{AuthRequest, AuthResponse, Challenge, DigitalIdentity};
pub use client::{HttpAuthority, DEFAULT_AUTHORITY_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{IdentityError, IdentityResult};
pub use gate::{BiometricGate, StaticGate};
pub use proof::{ProofInput, ProofToken, PROOF_VALIDITY_SECS};
pub use protocol::{IdentityProtocol, ProtocolState};
pub use secret::PrivateKey;
pub use store::{
    CredentialStore, KeyringCredentialStore, MemoryCredentialStore, DEFAULT_SERVICE,
    PRIVATE_KEY_ENTRY, PUBLIC_KEY_ENTRY,
};
pub use types::{
    CheckResponse, CreatedAt, IdentityFields, KeyPair, ProfileUpdate, UserInfo, UtcTime,
    VerificationVerdict,
};
