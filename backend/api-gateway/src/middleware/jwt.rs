//! JWT authentication middleware for API Gateway
//!
//! Every request except the public ones listed in [`is_public`] must carry
//! `Authorization: Bearer <token>`. A verified token puts an
//! [`AuthenticatedUser`] in the request extensions; anything else is
//! answered with 401 before a handler runs.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::{header, Method};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use crypto_core::TokenVerifier;
use futures_util::future::LocalBoxFuture;
use grpc_identity_propagation::CallerId;
use tracing::{debug, warn};

use crate::error::GatewayError;

/// Identity recovered from the bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub CallerId);

impl AuthenticatedUser {
    pub fn caller(&self) -> &CallerId {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = GatewayError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| GatewayError::unauthenticated("missing caller identity")),
        )
    }
}

fn is_public(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    match path {
        "/" | "/health" => true,
        "/auth/login" | "/auth/register" => method == Method::POST,
        _ => false,
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(req: &ServiceRequest) -> Result<&str, GatewayError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| GatewayError::unauthenticated("Authorization header is required"))?
        .to_str()
        .map_err(|_| GatewayError::unauthenticated("Invalid Authorization header format"))?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(GatewayError::unauthenticated(
            "Invalid Authorization header format",
        )),
    }
}

/// JWT authentication middleware
#[derive(Clone)]
pub struct JwtAuth {
    verifier: Arc<TokenVerifier>,
}

impl JwtAuth {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }

    fn authenticate(&self, req: &ServiceRequest) -> Result<AuthenticatedUser, GatewayError> {
        let token = bearer_token(req)?;
        let subject = self
            .verifier
            .verify(token)
            .map_err(|e| GatewayError::unauthenticated(e.to_string()))?;
        let caller = CallerId::parse(&subject)
            .map_err(|_| GatewayError::unauthenticated("token subject is not a valid identity"))?;
        Ok(AuthenticatedUser(caller))
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthService {
            service: Rc::new(service),
            auth: self.clone(),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
    auth: JwtAuth,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(req.method(), req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        match self.auth.authenticate(&req) {
            Ok(user) => {
                debug!(user_id = %user.caller(), path = req.path(), "Request authenticated");
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(err) => {
                warn!(
                    method = %req.method(),
                    path = req.path(),
                    reason = %err,
                    "Rejected unauthenticated request"
                );
                Box::pin(async move { Err(err.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use chrono::{Duration, Utc};
    use crypto_core::{SigningSecret, TokenIssuer};

    const SECRET: &str = "gateway-test-secret-0123456789abcdef";

    fn secret(raw: &str) -> SigningSecret {
        SigningSecret::new(raw).unwrap()
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.caller().to_string())
    }

    async fn open() -> HttpResponse {
        HttpResponse::Ok().body("ok")
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .wrap(JwtAuth::new(TokenVerifier::new(&secret(SECRET))))
                    .route("/health", web::get().to(open))
                    .route("/auth/login", web::post().to(open))
                    .route("/auth/login", web::get().to(whoami))
                    .route("/test", web::get().to(whoami))
                    .route("/test", web::method(Method::OPTIONS).to(open)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_valid_jwt_allows_access() {
        let app = app!();
        let token = TokenIssuer::new(&secret(SECRET)).issue("user-123").unwrap();

        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(test::read_body(resp).await, "user-123");
    }

    #[actix_web::test]
    async fn test_expired_jwt_rejected() {
        let app = app!();
        let token = TokenIssuer::new(&secret(SECRET))
            .issue_at("user-123", Utc::now() - Duration::hours(25))
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::try_call_service(&app, req).await;
        let err = resp.err().unwrap();
        assert_eq!(err.as_response_error().status_code(), 401);
        assert_eq!(err.to_string(), "token has expired");
    }

    #[actix_web::test]
    async fn test_foreign_secret_rejected() {
        let app = app!();
        let token = TokenIssuer::new(&secret("some-other-secret-0123456789abcdef"))
            .issue("user-123")
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/test")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let err = test::try_call_service(&app, req).await.err().unwrap();
        assert_eq!(err.as_response_error().status_code(), 401);
    }

    #[actix_web::test]
    async fn test_missing_or_malformed_authorization_header() {
        let app = app!();
        let token = TokenIssuer::new(&secret(SECRET)).issue("user-123").unwrap();

        let cases = [
            None,
            Some(token.clone()),
            Some(format!("Basic {token}")),
            Some(format!("Bearer {token} extra")),
            Some("Bearer ".to_string()),
        ];
        for header in cases {
            let mut req = test::TestRequest::get().uri("/test");
            if let Some(value) = header {
                req = req.insert_header(("Authorization", value));
            }
            let err = test::try_call_service(&app, req.to_request())
                .await
                .err()
                .unwrap();
            assert_eq!(err.as_response_error().status_code(), 401);
        }
    }

    #[actix_web::test]
    async fn test_public_routes_bypass_auth() {
        let app = app!();

        for req in [
            test::TestRequest::get().uri("/health").to_request(),
            test::TestRequest::post().uri("/auth/login").to_request(),
            test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri("/test")
                .to_request(),
        ] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 200);
        }

        // Only POST is public on the login path
        let req = test::TestRequest::get().uri("/auth/login").to_request();
        let err = test::try_call_service(&app, req).await.err().unwrap();
        assert_eq!(err.as_response_error().status_code(), 401);
    }
}
