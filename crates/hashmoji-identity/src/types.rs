//! # Wire Types
//!
//! Request and response bodies exchanged with the identity authority.
//!
//! Note that the authority's `emoji_sequence` field carries a hex string,
//! not display symbols. Conversion happens at the client boundary.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::secret::PrivateKey;

/// Identity metadata submitted at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityFields {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Fingerprint of the user's GPG key.
    pub gpg_fingerprint: String,
}

/// A keypair assigned by the authority at registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyPair {
    /// Public key; safe to share and used for lookups.
    pub public_key: String,
    /// Private key; the sole credential for this identity.
    pub private_key: PrivateKey,
}

#[derive(Debug, Serialize)]
pub(crate) struct PrivateKeyRequest<'a> {
    pub private_key: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PublicKeyRequest<'a> {
    pub public_key: &'a str,
}

/// Response to a key check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckResponse {
    /// Whether the authority recognizes the private key.
    pub exists: bool,
    /// The associated public key, when recognized.
    #[serde(default)]
    pub public_key: Option<String>,
}

/// Public profile of an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// GPG key fingerprint.
    #[serde(default)]
    pub gpg_fingerprint: Option<String>,
}

/// A partial profile update. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New GPG key fingerprint.
    pub gpg_fingerprint: Option<String>,
}

impl ProfileUpdate {
    /// Returns whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.gpg_fingerprint.is_none()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateUserInfoRequest<'a> {
    pub private_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpg_fingerprint: Option<&'a str>,
}

impl<'a> UpdateUserInfoRequest<'a> {
    pub(crate) fn new(private_key: &'a PrivateKey, update: &'a ProfileUpdate) -> Self {
        Self {
            private_key: private_key.expose(),
            email: update.email.as_deref(),
            phone_number: update.phone_number.as_deref(),
            name: update.name.as_deref(),
            gpg_fingerprint: update.gpg_fingerprint.as_deref(),
        }
    }
}

/// Body shared by the create-proof response and the verify request.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EmojiSequence<S> {
    pub emoji_sequence: S,
}

/// Wall-clock time of day reported by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTime {
    /// Hour, 0-23.
    pub hour: u32,
    /// Minute, 0-59.
    pub minute: u32,
    /// Second, 0-59.
    pub second: u32,
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02} UTC",
            self.hour, self.minute, self.second
        )
    }
}

/// Creation timestamp of a proof, as sent by the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    /// Seconds since the Unix epoch.
    Unix(i64),
    /// Seconds since the Unix epoch, with a fractional part.
    Fractional(f64),
    /// Free-form timestamp text.
    Text(String),
}

impl CreatedAt {
    /// Interprets the timestamp, if it is in a recognized format.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Unix(secs) => DateTime::<Utc>::from_timestamp(*secs, 0),
            Self::Fractional(secs) if secs.is_finite() => {
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9) as u32;
                DateTime::<Utc>::from_timestamp(whole as i64, nanos.min(999_999_999))
            }
            Self::Fractional(_) => None,
            Self::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                        .ok()
                        .map(|naive| naive.and_utc())
                }),
        }
    }
}

impl fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            None => match self {
                Self::Unix(secs) => write!(f, "{secs}"),
                Self::Fractional(secs) => write!(f, "{secs}"),
                Self::Text(s) => f.write_str(s),
            },
        }
    }
}

/// Outcome of verifying a proof with the authority.
///
/// The `public_key` and creation time only exist for verified proofs, and
/// the explanatory message only for rejected ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawVerdict")]
pub enum VerificationVerdict {
    /// The proof is valid and was issued by `public_key`.
    Verified {
        /// Public key of the identity that created the proof.
        public_key: String,
        /// When the proof was created.
        created_at: CreatedAt,
        /// Time of day the proof was created, when reported.
        created_at_utc: Option<UtcTime>,
    },
    /// The proof is unknown, expired or otherwise invalid.
    NotVerified {
        /// Reason given by the authority.
        message: String,
    },
}

impl VerificationVerdict {
    /// Returns whether the proof was verified.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    /// Returns the issuing public key of a verified proof.
    #[must_use]
    pub fn public_key(&self) -> Option<&str> {
        match self {
            Self::Verified { public_key, .. } => Some(public_key),
            Self::NotVerified { .. } => None,
        }
    }
}

const DEFAULT_REJECTION: &str = "verification failed";

#[derive(Deserialize)]
struct RawVerdict {
    verified: bool,
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default)]
    created_at: Option<CreatedAt>,
    #[serde(default)]
    created_at_utc: Option<UtcTime>,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<RawVerdict> for VerificationVerdict {
    type Error = String;

    fn try_from(raw: RawVerdict) -> Result<Self, Self::Error> {
        if !raw.verified {
            let message = raw
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
            return Ok(Self::NotVerified { message });
        }

        let public_key = raw
            .public_key
            .ok_or("verified response is missing public_key")?;
        let created_at = raw
            .created_at
            .ok_or("verified response is missing created_at")?;

        Ok(Self::Verified {
            public_key,
            created_at,
            created_at_utc: raw.created_at_utc,
        })
    }
}
