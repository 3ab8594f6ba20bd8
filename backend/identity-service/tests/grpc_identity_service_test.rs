// Integration tests for Identity Service gRPC API
//
// Each test starts the real AuthService behind the identity interceptor on
// an ephemeral port, backed by the in-memory document store, and talks to
// it through a generated client.

use std::net::SocketAddr;

use crypto_core::{SigningSecret, TokenIssuer, TokenVerifier};
use doc_store::StoreHandle;
use grpc_clients::identity::{
    DeleteUserRequest, EditUserRequest, GetUserRequest, LoginRequest, RegisterRequest,
};
use grpc_clients::{AuthServiceClient, AuthServiceServer};
use grpc_identity_propagation::{CallerId, IdentityInterceptor, IdentityServerInterceptor};
use identity_service::{IdentityServiceServer, User};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, Endpoint, Server};
use tonic::Code;

const SECRET: &str = "identity-it-secret-0123456789abcdef";

type Client = AuthServiceClient<InterceptedService<Channel, IdentityInterceptor>>;

async fn spawn_server(internal_key: Option<&'static str>) -> SocketAddr {
    let secret = SigningSecret::new(SECRET).unwrap();
    let service = IdentityServiceServer::new(
        StoreHandle::memory().collection::<User>(),
        TokenIssuer::new(&secret),
    );
    let interceptor = IdentityServerInterceptor::new(internal_key).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        Server::builder()
            .add_service(AuthServiceServer::with_interceptor(service, interceptor))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    addr
}

async fn client(addr: SocketAddr, caller: Option<&str>, key: Option<&str>) -> Client {
    let channel = Endpoint::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let interceptor = match caller {
        Some(id) => IdentityInterceptor::new(&CallerId::parse(id).unwrap()).unwrap(),
        None => IdentityInterceptor::anonymous(),
    }
    .with_internal_key(key)
    .unwrap();
    AuthServiceClient::with_interceptor(channel, interceptor)
}

fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        first_name: "Alice".into(),
        last_name: "Liddell".into(),
        email: email.into(),
        password: "wonderland".into(),
    }
}

// ============================================================================
// Registration and login
// ============================================================================

#[tokio::test]
async fn test_register_login_and_fetch_profile() {
    let addr = spawn_server(None).await;
    let verifier = TokenVerifier::new(&SigningSecret::new(SECRET).unwrap());

    let mut anon = client(addr, None, None).await;
    let registered = anon
        .register(register_request("alice@example.com"))
        .await
        .unwrap()
        .into_inner();
    let user_id = registered.user.unwrap().id;
    assert_eq!(verifier.verify(&registered.access_token).unwrap(), user_id);

    let login = anon
        .login(LoginRequest {
            email: "ALICE@example.com ".into(),
            password: "wonderland".into(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(verifier.verify(&login.access_token).unwrap(), user_id);

    let mut alice = client(addr, Some(&user_id), None).await;
    let profile = alice
        .get_user(GetUserRequest {})
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn test_profile_calls_require_propagated_identity() {
    let addr = spawn_server(None).await;
    let mut anon = client(addr, None, None).await;

    let status = anon.get_user(GetUserRequest {}).await.unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);

    let status = anon.delete_user(DeleteUserRequest {}).await.unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn test_wrong_password_is_unauthenticated() {
    let addr = spawn_server(None).await;
    let mut anon = client(addr, None, None).await;
    anon.register(register_request("alice@example.com"))
        .await
        .unwrap();

    let status = anon
        .login(LoginRequest {
            email: "alice@example.com".into(),
            password: "not-the-password".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "invalid credentials");
}

// ============================================================================
// Internal API key
// ============================================================================

#[tokio::test]
async fn test_internal_key_is_enforced() {
    let addr = spawn_server(Some("mesh-key")).await;

    let mut without = client(addr, None, None).await;
    let status = without
        .register(register_request("alice@example.com"))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);

    let mut with = client(addr, None, Some("mesh-key")).await;
    assert!(with
        .register(register_request("alice@example.com"))
        .await
        .is_ok());
}

// ============================================================================
// Profile updates and soft delete
// ============================================================================

#[tokio::test]
async fn test_email_change_respects_uniqueness() {
    let addr = spawn_server(None).await;
    let mut anon = client(addr, None, None).await;
    anon.register(register_request("alice@example.com"))
        .await
        .unwrap();
    let bob_id = anon
        .register(register_request("bob@example.com"))
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap()
        .id;

    let mut bob = client(addr, Some(&bob_id), None).await;
    let status = bob
        .edit_user(EditUserRequest {
            email: Some("alice@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::AlreadyExists);
}

#[tokio::test]
async fn test_deleted_user_reads_as_not_found() {
    let addr = spawn_server(None).await;
    let mut anon = client(addr, None, None).await;
    let user_id = anon
        .register(register_request("alice@example.com"))
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap()
        .id;

    let mut alice = client(addr, Some(&user_id), None).await;
    let deleted = alice
        .delete_user(DeleteUserRequest {})
        .await
        .unwrap()
        .into_inner()
        .user
        .unwrap();
    assert!(deleted.deleted_at.is_some());

    let status = alice.get_user(GetUserRequest {}).await.unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = anon
        .login(LoginRequest {
            email: "alice@example.com".into(),
            password: "wonderland".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
}
