//! End-to-end tests for the identity proof lifecycle against a mock authority.

use hashmoji_identity::{
    CreatedAt, HttpAuthority, IdentityError, IdentityFields, IdentityProtocol,
    MemoryCredentialStore, PrivateKey, ProfileUpdate, ProofInput, ProtocolState, StaticGate,
    VerificationVerdict,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_registration(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_key": "pub_ada",
            "private_key": "priv_ada"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/create_identity_proof"))
        .and(body_json(json!({"private_key": "priv_ada"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"emoji_sequence": "0a0b0c0d"})),
        )
        .mount(server)
        .await;
}

fn protocol(server: &MockServer) -> IdentityProtocol<HttpAuthority, MemoryCredentialStore> {
    let authority = HttpAuthority::new(server.uri()).unwrap();
    IdentityProtocol::new(authority, MemoryCredentialStore::new())
}

fn fields() -> IdentityFields {
    IdentityFields {
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        phone_number: "+44 20 0000 0000".into(),
        gpg_fingerprint: "ABCD1234".into(),
    }
}

// ==================== Proof Lifecycle ====================

#[tokio::test]
async fn test_register_create_and_verify_proof() {
    let server = MockServer::start().await;
    mount_registration(&server).await;

    Mock::given(method("POST"))
        .and(path("/verify_identity"))
        .and(body_json(json!({"emoji_sequence": "0A0B0C0D"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verified": true,
            "public_key": "pub_ada",
            "created_at": 1_700_000_000,
            "created_at_utc": {"hour": 22, "minute": 13, "second": 20}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut protocol = protocol(&server);
    let pair = protocol.register(&fields()).await.unwrap();
    assert_eq!(protocol.state(), ProtocolState::Registered);

    let token = protocol.create_proof().await.unwrap();
    assert_eq!(token.hex, "0a0b0c0d");

    // The verifier only sees the symbols.
    let input = ProofInput::parse(&format!(" {} ", token.symbols)).unwrap();
    let verdict = protocol.verify_proof(&input).await.unwrap();

    assert_eq!(verdict.public_key(), Some(pair.public_key.as_str()));
    match verdict {
        VerificationVerdict::Verified {
            created_at,
            created_at_utc,
            ..
        } => {
            assert_eq!(created_at, CreatedAt::Unix(1_700_000_000));
            assert_eq!(created_at_utc.unwrap().to_string(), "22:13:20 UTC");
        }
        VerificationVerdict::NotVerified { message } => panic!("rejected: {message}"),
    }
}

#[tokio::test]
async fn test_expired_proof_is_rejected_with_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/verify_identity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verified": false,
            "message": "Proof has expired"
        })))
        .mount(&server)
        .await;

    let protocol = protocol(&server);
    let verdict = protocol
        .verify_proof(&ProofInput::parse("0a0b0c0d").unwrap())
        .await
        .unwrap();

    assert!(!verdict.is_verified());
    assert_eq!(verdict.public_key(), None);
    match verdict {
        VerificationVerdict::NotVerified { message } => assert!(!message.is_empty()),
        VerificationVerdict::Verified { .. } => panic!("expected rejection"),
    }
}

#[tokio::test]
async fn test_unknown_symbol_never_reaches_authority() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/verify_identity"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let protocol = protocol(&server);
    let err = protocol
        .verify_proof(&ProofInput::parse("not a proof").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::UnknownSymbol { .. }));
}

// ==================== Account Management ====================

#[tokio::test]
async fn test_login_profile_update_and_logout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/check"))
        .and(body_json(json!({"private_key": "priv_ada"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"exists": true, "public_key": "pub_ada"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/update_user_info"))
        .and(body_json(json!({"private_key": "priv_ada", "email": "new@example.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user_info"))
        .and(body_json(json!({"public_key": "pub_ada"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Ada Lovelace",
            "email": "new@example.com"
        })))
        .mount(&server)
        .await;

    let mut protocol = protocol(&server);
    assert!(protocol.login(PrivateKey::new("priv_ada")).await.unwrap());
    assert_eq!(protocol.state(), ProtocolState::Authenticated);

    let update = ProfileUpdate {
        email: Some("new@example.com".into()),
        ..ProfileUpdate::default()
    };
    assert!(protocol.update_user_info(&update).await.unwrap());

    let public_key = protocol.public_key().unwrap().unwrap();
    let info = protocol.fetch_user_info(&public_key).await.unwrap().unwrap();
    assert_eq!(info.email.as_deref(), Some("new@example.com"));

    let revealed = protocol.reveal_private_key(&StaticGate::allow()).unwrap();
    assert_eq!(revealed.expose(), "priv_ada");

    protocol.logout().unwrap();
    assert_eq!(protocol.state(), ProtocolState::Unregistered);
    assert!(matches!(
        protocol.create_proof().await,
        Err(IdentityError::NotRegistered)
    ));
}

#[tokio::test]
async fn test_unknown_user_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user_info"))
        .respond_with(ResponseTemplate::new(404).set_body_string("User not found"))
        .mount(&server)
        .await;

    let protocol = protocol(&server);
    assert_eq!(protocol.fetch_user_info("pub_nobody").await.unwrap(), None);
}
