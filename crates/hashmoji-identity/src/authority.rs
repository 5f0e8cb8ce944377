//! The identity authority boundary.

use async_trait::async_trait;

use crate::error::IdentityResult;
use crate::secret::PrivateKey;
use crate::types::{
    CheckResponse, IdentityFields, KeyPair, ProfileUpdate, UserInfo, VerificationVerdict,
};

/// Remote service that issues keys, mints proofs and verifies them.
///
/// Proof payloads cross this boundary as hex strings; conversion to and
/// from display symbols is the caller's job.
#[async_trait]
pub trait IdentityAuthority: Send + Sync {
    /// Registers a new identity and returns its keypair.
    async fn register(&self, fields: &IdentityFields) -> IdentityResult<KeyPair>;

    /// Asks whether `private_key` is known.
    async fn check(&self, private_key: &PrivateKey) -> IdentityResult<CheckResponse>;

    /// Looks up the profile for `public_key`. Returns `None` if unknown.
    async fn user_info(&self, public_key: &str) -> IdentityResult<Option<UserInfo>>;

    /// Updates the profile owned by `private_key`.
    async fn update_user_info(
        &self,
        private_key: &PrivateKey,
        update: &ProfileUpdate,
    ) -> IdentityResult<()>;

    /// Mints a new proof and returns its hex payload.
    async fn create_identity_proof(&self, private_key: &PrivateKey) -> IdentityResult<String>;

    /// Verifies a hex proof payload.
    async fn verify_identity(&self, hex: &str) -> IdentityResult<VerificationVerdict>;
}
