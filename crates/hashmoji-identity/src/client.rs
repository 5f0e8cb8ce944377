//! # Authority Client
//!
//! HTTP client for the identity authority.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::authority::IdentityAuthority;
use crate::challenge::{AuthRequest, AuthResponse};
use crate::error::{IdentityError, IdentityResult};
use crate::secret::PrivateKey;
use crate::types::{
    CheckResponse, EmojiSequence, IdentityFields, KeyPair, PrivateKeyRequest, ProfileUpdate,
    PublicKeyRequest, UpdateUserInfoRequest, UserInfo, VerificationVerdict,
};

/// Default authority endpoint.
pub const DEFAULT_AUTHORITY_URL: &str = "https://nichokas.hackclub.app";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the identity authority.
///
/// The client is cheaply cloneable and can be shared across tasks.
///
/// # Examples
///
/// ```rust,ignore
/// use hashmoji_identity::{HttpAuthority, IdentityAuthority};
///
/// let authority = HttpAuthority::new("http://localhost:8080")?;
/// let verdict = authority.verify_identity("0A0B0C0D").await?;
/// println!("verified: {}", verdict.is_verified());
/// ```
#[derive(Debug, Clone)]
pub struct HttpAuthority {
    base_url: String,
    http: Client,
}

impl HttpAuthority {
    /// Creates a client for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> IdentityResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client for `base_url` with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Network`] if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> IdentityResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticates with a signed HMAC challenge.
    ///
    /// # Errors
    ///
    /// * [`IdentityError::Network`] - Network request failed
    /// * [`IdentityError::Protocol`] - Challenge rejected (401) or stale
    /// * [`IdentityError::Decode`] - Response could not be parsed
    pub async fn authenticate(&self, request: &AuthRequest) -> IdentityResult<AuthResponse> {
        tracing::debug!(device_id = %request.device_id, "Authenticating with challenge");
        let res = self.send(self.http.post(self.url("/auth")).json(request)).await?;
        decode(res).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> IdentityResult<Response> {
        let res = request.send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let message = res.text().await.unwrap_or_default();
            tracing::debug!(status, %message, "Authority rejected request");
            return Err(IdentityError::Protocol { status, message });
        }

        Ok(res)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> IdentityResult<T> {
    res.json()
        .await
        .map_err(|e| IdentityError::Decode(e.to_string()))
}

#[async_trait]
impl IdentityAuthority for HttpAuthority {
    async fn register(&self, fields: &IdentityFields) -> IdentityResult<KeyPair> {
        let res = self
            .send(self.http.post(self.url("/register")).json(fields))
            .await?;
        decode(res).await
    }

    async fn check(&self, private_key: &PrivateKey) -> IdentityResult<CheckResponse> {
        let body = PrivateKeyRequest {
            private_key: private_key.expose(),
        };
        let res = self.send(self.http.post(self.url("/check")).json(&body)).await?;
        decode(res).await
    }

    async fn user_info(&self, public_key: &str) -> IdentityResult<Option<UserInfo>> {
        let body = PublicKeyRequest { public_key };
        let res = self
            .http
            .post(self.url("/user_info"))
            .json(&body)
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            return Err(IdentityError::Protocol {
                status: res.status().as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }

        decode(res).await.map(Some)
    }

    async fn update_user_info(
        &self,
        private_key: &PrivateKey,
        update: &ProfileUpdate,
    ) -> IdentityResult<()> {
        let body = UpdateUserInfoRequest::new(private_key, update);
        self.send(self.http.put(self.url("/update_user_info")).json(&body))
            .await?;
        Ok(())
    }

    async fn create_identity_proof(&self, private_key: &PrivateKey) -> IdentityResult<String> {
        let body = PrivateKeyRequest {
            private_key: private_key.expose(),
        };
        let res = self
            .send(self.http.post(self.url("/create_identity_proof")).json(&body))
            .await?;
        let payload: EmojiSequence<String> = decode(res).await?;
        Ok(payload.emoji_sequence)
    }

    async fn verify_identity(&self, hex: &str) -> IdentityResult<VerificationVerdict> {
        let body = EmojiSequence { emoji_sequence: hex };
        let res = self
            .send(self.http.post(self.url("/verify_identity")).json(&body))
            .await?;
        decode(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::Challenge;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn authority(server: &MockServer) -> HttpAuthority {
        HttpAuthority::new(server.uri()).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let authority = HttpAuthority::new("http://localhost:8080/").unwrap();
        assert_eq!(authority.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn register_posts_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/register"))
            .and(body_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "phone_number": "555",
                "gpg_fingerprint": "ABCD"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"public_key": "pub", "private_key": "priv"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fields = IdentityFields {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone_number: "555".into(),
            gpg_fingerprint: "ABCD".into(),
        };
        let pair = authority(&server).await.register(&fields).await.unwrap();

        assert_eq!(pair.public_key, "pub");
        assert_eq!(pair.private_key.expose(), "priv");
    }

    #[tokio::test]
    async fn check_sends_private_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/check"))
            .and(body_json(json!({"private_key": "priv"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"exists": true, "public_key": "pub"})),
            )
            .mount(&server)
            .await;

        let res = authority(&server)
            .await
            .check(&PrivateKey::new("priv"))
            .await
            .unwrap();

        assert!(res.exists);
        assert_eq!(res.public_key.as_deref(), Some("pub"));
    }

    #[tokio::test]
    async fn non_success_status_is_protocol_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/check"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = authority(&server)
            .await
            .check(&PrivateKey::new("priv"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "authority error: 500 - boom");
    }

    #[tokio::test]
    async fn unreachable_authority_is_network_error() {
        let authority = HttpAuthority::with_timeout("http://127.0.0.1:9", Duration::from_secs(5))
            .unwrap();

        let err = authority
            .check(&PrivateKey::new("priv"))
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::Network(_)), "got {err:?}");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/create_identity_proof"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = authority(&server)
            .await
            .create_identity_proof(&PrivateKey::new("priv"))
            .await
            .unwrap_err();

        assert!(matches!(err, IdentityError::Decode(_)));
    }

    #[tokio::test]
    async fn user_info_not_found_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/user_info"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let info = authority(&server).await.user_info("nobody").await.unwrap();
        assert_eq!(info, None);
    }

    #[tokio::test]
    async fn user_info_decodes_partial_profile() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/user_info"))
            .and(body_json(json!({"public_key": "pub"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Ada"})))
            .mount(&server)
            .await;

        let info = authority(&server).await.user_info("pub").await.unwrap();
        assert_eq!(
            info,
            Some(UserInfo {
                name: Some("Ada".into()),
                ..UserInfo::default()
            })
        );
    }

    #[tokio::test]
    async fn update_user_info_uses_put_and_omits_absent_fields() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/update_user_info"))
            .and(body_json(json!({"private_key": "priv", "name": "Grace"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let update = ProfileUpdate {
            name: Some("Grace".into()),
            ..ProfileUpdate::default()
        };
        authority(&server)
            .await
            .update_user_info(&PrivateKey::new("priv"), &update)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_proof_returns_hex_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/create_identity_proof"))
            .and(body_json(json!({"private_key": "priv"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"emoji_sequence": "0a0b0c0d"})),
            )
            .mount(&server)
            .await;

        let hex = authority(&server)
            .await
            .create_identity_proof(&PrivateKey::new("priv"))
            .await
            .unwrap();
        assert_eq!(hex, "0a0b0c0d");
    }

    #[tokio::test]
    async fn verify_identity_sends_hex_in_emoji_sequence() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/verify_identity"))
            .and(body_json(json!({"emoji_sequence": "0A0B"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"verified": false, "message": "expired"})),
            )
            .mount(&server)
            .await;

        let verdict = authority(&server)
            .await
            .verify_identity("0A0B")
            .await
            .unwrap();
        assert_eq!(
            verdict,
            VerificationVerdict::NotVerified {
                message: "expired".into()
            }
        );
    }

    #[tokio::test]
    async fn authenticate_posts_signed_challenge() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth"))
            .and(body_json(json!({
                "device_id": "device-1",
                "challenge_response": "R2Fca7Uwv6trMUQ0EZwgd37F8b46YNZNrnJLoxkThmY=",
                "timestamp": 1_700_000_000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "session",
                "identity": {
                    "id": "id-1",
                    "username": "ada",
                    "device_id": "device-1",
                    "created_at": 1_700_000_000
                }
            })))
            .mount(&server)
            .await;

        let request = Challenge::new("device-1", 1_700_000_000)
            .into_request(b"api-key")
            .unwrap();
        let res = authority(&server).await.authenticate(&request).await.unwrap();

        assert_eq!(res.token, "session");
        assert_eq!(res.identity.username, "ada");
    }

    #[tokio::test]
    async fn authenticate_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid challenge"))
            .mount(&server)
            .await;

        let request = Challenge::new("device-1", 1).into_request(b"k").unwrap();
        let err = authority(&server)
            .await
            .authenticate(&request)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }
}
