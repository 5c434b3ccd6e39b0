//! Integration tests for the authorization gate against a stub authority.

mod common;

use common::{closed_url, StubServer};
use licensegate::authority::{AuthorityClient, AuthorizationRequest};
use licensegate::error::GateError;
use licensegate::identity::Identity;
use std::time::Duration;

fn identity() -> Identity {
    Identity {
        public_ip: "203.0.113.7".to_string(),
        machine_id: "4c4c4544-004e-3510".to_string(),
    }
}

fn client(base: &str) -> AuthorityClient {
    AuthorityClient::with_timeout(
        format!("{}/v1", base),
        "installer-key",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_allowed_verdict_grants() {
    let authority = StubServer::authority(200, true, "OK");
    let grant = client(&authority.url)
        .validate("LIC-0001-AAAA", &identity())
        .await
        .unwrap();

    assert_eq!(grant.license_key, "LIC-0001-AAAA");
    assert_eq!(grant.identity, identity());
    assert_eq!(grant.message, "OK");
}

#[tokio::test]
async fn test_request_shape() {
    let authority = StubServer::authority(200, true, "OK");
    client(&authority.url)
        .validate("LIC-0001-AAAA", &identity())
        .await
        .unwrap();

    let requests = authority.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/v1/auth/check");
    assert_eq!(request.header("x-api-key"), Some("installer-key"));
    assert!(request
        .header("content-type")
        .unwrap_or_default()
        .starts_with("application/json"));

    // The authority sees exactly the triple we sent.
    let parsed: AuthorizationRequest = serde_json::from_str(&request.body).unwrap();
    assert_eq!(parsed, AuthorizationRequest::new("LIC-0001-AAAA", &identity()));
    assert!(!request.body.contains("installer-key"), "the API key travels only in the header");
}

#[tokio::test]
async fn test_refused_verdict_is_denied_with_message() {
    let authority = StubServer::authority(200, false, "License is inactive");
    let err = client(&authority.url)
        .validate("LIC-0001-AAAA", &identity())
        .await
        .unwrap_err();

    match err {
        GateError::Denied { message, status } => {
            assert_eq!(message, "License is inactive");
            assert_eq!(status, 200);
        }
        other => panic!("expected Denied, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_200_is_denied_even_if_allowed() {
    for status in [201, 403, 500] {
        let authority =
            StubServer::authority(status, true, "IP address not authorized for this license");
        let err = client(&authority.url)
            .validate("LIC-0001-AAAA", &identity())
            .await
            .unwrap_err();

        match err {
            GateError::Denied { message, status: got } => {
                assert_eq!(message, "IP address not authorized for this license");
                assert_eq!(got, status);
            }
            other => panic!("expected Denied for {}, got {:?}", status, other),
        }
    }
}

#[tokio::test]
async fn test_unparseable_body_is_protocol_error() {
    let authority = StubServer::start(401, r#"{"error":"API key required"}"#);
    let err = client(&authority.url)
        .validate("LIC-0001-AAAA", &identity())
        .await
        .unwrap_err();

    match err {
        GateError::Protocol { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"error":"API key required"}"#);
        }
        other => panic!("expected Protocol, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_authority_is_transport_error() {
    let err = client(&closed_url())
        .validate("LIC-0001-AAAA", &identity())
        .await
        .unwrap_err();

    assert!(matches!(err, GateError::Transport { .. }), "got {:?}", err);
}
