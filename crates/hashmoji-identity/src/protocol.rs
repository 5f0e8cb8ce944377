//! # Identity Proof Protocol
//!
//! Client-side state machine for registering an identity, minting
//! time-boxed proofs and verifying proofs shown by others.
//!
//! ```text
//!  Unregistered ──register / resume──▶ Registered
//!       │                                  │
//!       └──────────── login ───────────────┴──login──▶ Authenticated
//!
//!  any state ──logout──▶ Unregistered
//! ```

use chrono::Utc;

use hashmoji_core::SymbolAlphabet;

use crate::authority::IdentityAuthority;
use crate::error::{IdentityError, IdentityResult};
use crate::gate::BiometricGate;
use crate::proof::{ProofInput, ProofToken};
use crate::secret::PrivateKey;
use crate::store::{CredentialStore, PRIVATE_KEY_ENTRY, PUBLIC_KEY_ENTRY};
use crate::types::{
    CheckResponse, IdentityFields, KeyPair, ProfileUpdate, UserInfo, VerificationVerdict,
};

/// Reason shown by the gate before revealing the private key.
const REVEAL_REASON: &str = "Reveal your private key";

/// Where the local identity stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// No keys are stored.
    Unregistered,
    /// Keys are stored but have not been checked this session.
    Registered,
    /// Keys were confirmed by the authority this session.
    Authenticated,
}

impl ProtocolState {
    /// Returns whether local keys are available.
    #[must_use]
    pub fn has_keys(self) -> bool {
        !matches!(self, Self::Unregistered)
    }
}

/// Identity proof client over an authority and a credential store.
pub struct IdentityProtocol<A, S> {
    authority: A,
    store: S,
    alphabet: &'static SymbolAlphabet,
    state: ProtocolState,
}

impl<A, S> IdentityProtocol<A, S>
where
    A: IdentityAuthority,
    S: CredentialStore,
{
    /// Creates a protocol in the [`ProtocolState::Unregistered`] state.
    ///
    /// Call [`IdentityProtocol::resume`] to pick up keys stored by an
    /// earlier session.
    pub fn new(authority: A, store: S) -> Self {
        Self {
            authority,
            store,
            alphabet: SymbolAlphabet::global(),
            state: ProtocolState::Unregistered,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Returns the authority.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Returns the credential store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the alphabet used for proof symbols.
    #[must_use]
    pub fn alphabet(&self) -> &'static SymbolAlphabet {
        self.alphabet
    }

    /// Restores state from the credential store.
    ///
    /// Both keys present means [`ProtocolState::Registered`]; anything less
    /// means [`ProtocolState::Unregistered`].
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Store`] if the store cannot be read.
    pub fn resume(&mut self) -> IdentityResult<ProtocolState> {
        let public_key = self.store.read(PUBLIC_KEY_ENTRY)?;
        let private_key = self.store.read(PRIVATE_KEY_ENTRY)?;

        self.state = if public_key.is_some() && private_key.is_some() {
            ProtocolState::Registered
        } else {
            ProtocolState::Unregistered
        };
        tracing::debug!(state = ?self.state, "Resumed identity state");
        Ok(self.state)
    }

    /// Registers a new identity and stores its keys.
    ///
    /// # Errors
    ///
    /// Returns authority errors unchanged, or [`IdentityError::Store`] if
    /// the keys cannot be persisted.
    pub async fn register(&mut self, fields: &IdentityFields) -> IdentityResult<KeyPair> {
        tracing::info!(name = %fields.name, "Registering identity");
        let pair = self.authority.register(fields).await?;
        self.persist(&pair.public_key, &pair.private_key)?;
        self.state = ProtocolState::Registered;
        tracing::info!(public_key = %pair.public_key, "Identity registered");
        Ok(pair)
    }

    /// Asks the authority whether `private_key` is recognized.
    ///
    /// Nothing is stored and the state does not change.
    ///
    /// # Errors
    ///
    /// Returns authority errors unchanged.
    pub async fn check_keys(&self, private_key: &PrivateKey) -> IdentityResult<CheckResponse> {
        self.authority.check(private_key).await
    }

    /// Logs in with an existing private key.
    ///
    /// Returns `false`, leaving state and store untouched, if the authority
    /// does not recognize the key.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidInput`] for an empty key,
    /// [`IdentityError::Decode`] if the authority recognizes the key but
    /// omits its public key, and authority or store errors unchanged.
    pub async fn login(&mut self, private_key: PrivateKey) -> IdentityResult<bool> {
        if private_key.is_empty() {
            return Err(IdentityError::InvalidInput(
                "private key is empty".to_string(),
            ));
        }

        let res = self.authority.check(&private_key).await?;
        if !res.exists {
            tracing::info!("Private key not recognized");
            return Ok(false);
        }

        let public_key = res.public_key.ok_or_else(|| {
            IdentityError::Decode("check response is missing public_key".to_string())
        })?;
        self.persist(&public_key, &private_key)?;
        self.state = ProtocolState::Authenticated;
        tracing::info!(%public_key, "Logged in");
        Ok(true)
    }

    /// Deletes stored keys.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Store`] if an entry cannot be deleted.
    pub fn logout(&mut self) -> IdentityResult<()> {
        self.store.delete(PUBLIC_KEY_ENTRY)?;
        self.store.delete(PRIVATE_KEY_ENTRY)?;
        self.state = ProtocolState::Unregistered;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Returns the stored public key, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Store`] if the store cannot be read.
    pub fn public_key(&self) -> IdentityResult<Option<String>> {
        self.store.read(PUBLIC_KEY_ENTRY)
    }

    /// Returns the stored private key once `gate` authorizes it.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::NotRegistered`] - No key is stored
    /// * [`IdentityError::NotAuthorized`] - The gate refused
    pub fn reveal_private_key(&self, gate: &dyn BiometricGate) -> IdentityResult<PrivateKey> {
        let key = self.private_key()?;
        if !gate.authorize(REVEAL_REASON) {
            tracing::warn!("Private key reveal denied");
            return Err(IdentityError::NotAuthorized(REVEAL_REASON.to_string()));
        }
        Ok(key)
    }

    /// Mints a new proof for the stored identity.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::NotRegistered`] - No identity on this device
    /// * [`IdentityError::Decode`] - The authority returned a non-hex payload
    pub async fn create_proof(&self) -> IdentityResult<ProofToken> {
        if !self.state.has_keys() {
            return Err(IdentityError::NotRegistered);
        }
        let private_key = self.private_key()?;

        let hex = self.authority.create_identity_proof(&private_key).await?;
        let token = ProofToken::from_hex(hex, self.alphabet, Utc::now())?;
        tracing::info!(
            symbols = %token.symbols,
            expires_at = %token.expires_at(),
            "Created identity proof"
        );
        Ok(token)
    }

    /// Verifies a proof presented by someone else.
    ///
    /// Symbol input is converted to hex locally, so an unknown symbol fails
    /// before anything is sent.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::UnknownSymbol`] - A symbol is not in the alphabet
    /// * [`IdentityError::InvalidInput`] - The input is empty or malformed
    pub async fn verify_proof(&self, input: &ProofInput) -> IdentityResult<VerificationVerdict> {
        let hex = input.to_wire_hex(self.alphabet)?;
        let verdict = self.authority.verify_identity(&hex).await?;
        match &verdict {
            VerificationVerdict::Verified { public_key, .. } => {
                tracing::info!(%public_key, "Proof verified");
            }
            VerificationVerdict::NotVerified { message } => {
                tracing::info!(%message, "Proof rejected");
            }
        }
        Ok(verdict)
    }

    /// Looks up the profile for `public_key`.
    ///
    /// # Errors
    ///
    /// Returns authority errors other than not-found unchanged.
    pub async fn fetch_user_info(&self, public_key: &str) -> IdentityResult<Option<UserInfo>> {
        let info = self.authority.user_info(public_key).await?;
        tracing::debug!(public_key, found = info.is_some(), "Fetched user info");
        Ok(info)
    }

    /// Updates the stored identity's profile with the fields set in
    /// `update`.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::InvalidInput`] - `update` sets no field
    /// * [`IdentityError::NotRegistered`] - No private key is stored
    pub async fn update_user_info(&self, update: &ProfileUpdate) -> IdentityResult<bool> {
        if update.is_empty() {
            return Err(IdentityError::InvalidInput(
                "no profile fields to update".to_string(),
            ));
        }
        let private_key = self.private_key()?;
        self.authority
            .update_user_info(&private_key, update)
            .await?;
        tracing::info!("Updated user info");
        Ok(true)
    }

    fn private_key(&self) -> IdentityResult<PrivateKey> {
        self.store
            .read(PRIVATE_KEY_ENTRY)?
            .map(PrivateKey::new)
            .ok_or(IdentityError::NotRegistered)
    }

    fn persist(&self, public_key: &str, private_key: &PrivateKey) -> IdentityResult<()> {
        self.store.save(PUBLIC_KEY_ENTRY, public_key)?;
        self.store.save(PRIVATE_KEY_ENTRY, private_key.expose())
    }
}
