//! Integration Tests for Identity Propagation
//!
//! These tests verify the complete flow:
//! Bearer token -> edge verification -> client interceptor -> server
//! interceptor -> handler access

use crypto_core::{SigningSecret, TokenIssuer, TokenVerifier};
use grpc_identity_propagation::{
    CallerId, CallerIdentityExt, IdentityInterceptor, IdentityServerInterceptor,
    USER_ID_METADATA_KEY,
};
use tonic::service::Interceptor;
use tonic::{Request, Status};

const TEST_SECRET: &str = "propagation-tests-shared-secret-000000";

fn keys() -> (TokenIssuer, TokenVerifier) {
    let secret = SigningSecret::new(TEST_SECRET).expect("test secret is long enough");
    (TokenIssuer::new(&secret), TokenVerifier::new(&secret))
}

/// Verify at the edge, then push the identity through both interceptors
fn simulate_grpc_flow(
    verifier: &TokenVerifier,
    token: &str,
    internal_key: Option<&str>,
    server_key: Option<&str>,
) -> Result<Request<()>, Status> {
    // EDGE: verify bearer token
    let subject = verifier
        .verify(token)
        .map_err(|e| Status::unauthenticated(e.to_string()))?;
    let caller = CallerId::parse(&subject)?;

    // CLIENT SIDE
    let mut client = IdentityInterceptor::new(&caller)?.with_internal_key(internal_key)?;
    let request = client.call(Request::new(()))?;

    // SERVER SIDE
    let mut server = IdentityServerInterceptor::new(server_key)?;
    server.call(request)
}

#[test]
fn test_end_to_end_identity_flow() {
    let (issuer, verifier) = keys();
    let token = issuer.issue("alice").expect("Failed to issue token");

    let request = simulate_grpc_flow(&verifier, &token, None, None).expect("Flow should succeed");

    assert_eq!(request.caller_id().unwrap().as_str(), "alice");
}

#[test]
fn test_end_to_end_invalid_token_never_reaches_backend() {
    let (_, verifier) = keys();

    let status = simulate_grpc_flow(&verifier, "invalid.jwt.token", None, None).unwrap_err();
    assert_eq!(status.code(), tonic::Code::Unauthenticated);
}

#[test]
fn test_end_to_end_internal_key() {
    let (issuer, verifier) = keys();
    let token = issuer.issue("alice").unwrap();

    let ok = simulate_grpc_flow(&verifier, &token, Some("mesh-key"), Some("mesh-key"));
    assert!(ok.is_ok());

    let missing = simulate_grpc_flow(&verifier, &token, None, Some("mesh-key")).unwrap_err();
    assert_eq!(missing.code(), tonic::Code::Unauthenticated);
}

#[test]
fn test_backend_rejects_call_without_identity() {
    // A caller that bypasses the gateway and omits the identity pair
    let mut server = IdentityServerInterceptor::default();
    let request = server.call(Request::new(())).unwrap();

    let status = request.caller_id().unwrap_err();
    assert_eq!(status.code(), tonic::Code::Unauthenticated);
}

#[test]
fn test_identity_is_metadata_not_body() {
    let caller = CallerId::parse("alice").unwrap();
    let mut client = IdentityInterceptor::new(&caller).unwrap();

    let request = client.call(Request::new(())).unwrap();
    let (metadata, _, ()) = request.into_parts();

    assert_eq!(
        metadata.get(USER_ID_METADATA_KEY).unwrap().to_str().unwrap(),
        "alice"
    );
}
