//! HMAC challenge authentication.
//!
//! An alternative to sending the raw private key: the device signs
//! `device_id:timestamp` with a shared secret and posts the signature to
//! `/auth`. See [`crate::HttpAuthority::authenticate`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{IdentityError, IdentityResult};
use crate::types::CreatedAt;

type HmacSha256 = Hmac<Sha256>;

/// A challenge bound to a device and a moment in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    device_id: String,
    timestamp: i64,
}

impl Challenge {
    /// Creates a challenge for `device_id` at `timestamp` (Unix seconds).
    pub fn new(device_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            device_id: device_id.into(),
            timestamp,
        }
    }

    /// Creates a challenge stamped with the current time.
    pub fn now(device_id: impl Into<String>) -> Self {
        Self::new(device_id, chrono::Utc::now().timestamp())
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the challenge timestamp.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the signed message, `device_id:timestamp`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{}:{}", self.device_id, self.timestamp)
    }

    /// Signs the challenge with HMAC-SHA256 and returns the base64 tag.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidInput`] if the secret is rejected by
    /// the MAC.
    pub fn sign(&self, secret: &[u8]) -> IdentityResult<String> {
        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| IdentityError::InvalidInput(format!("challenge secret: {e}")))?;
        mac.update(self.message().as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Signs the challenge and packages it as an `/auth` request body.
    ///
    /// # Errors
    ///
    /// See [`Challenge::sign`].
    pub fn into_request(self, secret: &[u8]) -> IdentityResult<AuthRequest> {
        let challenge_response = self.sign(secret)?;
        Ok(AuthRequest {
            device_id: self.device_id,
            challenge_response,
            timestamp: self.timestamp,
        })
    }
}

/// Body posted to `/auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest {
    /// Device identifier.
    pub device_id: String,
    /// Base64 HMAC-SHA256 of `device_id:timestamp`.
    pub challenge_response: String,
    /// Unix seconds the challenge was created at.
    pub timestamp: i64,
}

/// Successful `/auth` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    /// Session token.
    pub token: String,
    /// The authenticated identity.
    pub identity: DigitalIdentity,
}

/// Identity record returned by `/auth`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DigitalIdentity {
    /// Identity identifier.
    pub id: String,
    /// User name.
    pub username: String,
    /// Device bound to this identity.
    pub device_id: String,
    /// When the identity was created.
    pub created_at: CreatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn message_format() {
        let challenge = Challenge::new("device-1", 1_700_000_000);
        assert_eq!(challenge.message(), "device-1:1700000000");
    }

    #[test]
    fn sign_matches_known_vector() {
        let challenge = Challenge::new("device-1", 1_700_000_000);
        assert_eq!(
            challenge.sign(b"api-key").unwrap(),
            "R2Fca7Uwv6trMUQ0EZwgd37F8b46YNZNrnJLoxkThmY="
        );
    }

    #[test]
    fn into_request_carries_signature() {
        let request = Challenge::new("device-1", 1_700_000_000)
            .into_request(b"api-key")
            .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "device_id": "device-1",
                "challenge_response": "R2Fca7Uwv6trMUQ0EZwgd37F8b46YNZNrnJLoxkThmY=",
                "timestamp": 1_700_000_000
            })
        );
    }

    #[test]
    fn different_secrets_differ() {
        let challenge = Challenge::new("device-1", 1);
        assert_ne!(
            challenge.sign(b"one").unwrap(),
            challenge.sign(b"two").unwrap()
        );
    }

    #[test]
    fn auth_response_decodes() {
        let res: AuthResponse = serde_json::from_value(json!({
            "token": "t",
            "identity": {
                "id": "i",
                "username": "u",
                "device_id": "d",
                "created_at": 1_700_000_000
            }
        }))
        .unwrap();
        assert_eq!(res.token, "t");
        assert_eq!(res.identity.created_at, CreatedAt::Unix(1_700_000_000));
    }
}
