/// REST API Module
///
/// HTTP endpoints for the web client. Each handler validates its input,
/// makes exactly one gRPC call to the owning backend and reshapes the
/// reply:
///
/// ```text
/// Client (HTTP/JSON)
///     ↓
/// JwtAuth (attaches AuthenticatedUser)
///     ↓
/// REST handler (this module)
///     ↓
/// gRPC client → identity / integration / workflow service
/// ```
pub mod auth;
pub mod docs;
pub mod integration;
pub mod models;
pub mod project;
pub mod workflow;

use std::future::Future;

use actix_web::{web, HttpResponse};
use serde_json::json;
use tonic::{Response, Status};
use tracing::error;

use crate::error::GatewayError;

/// Run one backend call to completion and unwrap its message.
///
/// The call is spawned so that a client hanging up mid-request does not
/// cancel work the backend has already started.
pub async fn dispatch<T, F>(call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<Response<T>, Status>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(result) => result.map(Response::into_inner).map_err(GatewayError::from),
        Err(e) => {
            error!(error = %e, "Backend call task failed");
            Err(GatewayError::internal("backend call aborted"))
        }
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok", "service": "api-gateway" }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

/// Register every route. Extractor failures render as JSON 400s.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        GatewayError::invalid_input(format!("invalid request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        GatewayError::invalid_input(format!("invalid query string: {err}")).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        GatewayError::invalid_input(format!("invalid path: {err}")).into()
    }))
    .route("/", web::get().to(index))
    .route("/health", web::get().to(health))
    .service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/register", web::post().to(auth::register))
            .route("", web::get().to(auth::get_user))
            .route("", web::patch().to(auth::edit_user))
            .route("", web::delete().to(auth::delete_user)),
    )
    .service(
        web::scope("/integration")
            .route("", web::post().to(integration::create_integration))
            .route("/user", web::get().to(integration::get_user_integrations))
            .route("/search", web::get().to(integration::search_integrations))
            .route("/community", web::get().to(integration::get_community_integrations))
            .route("/{id}", web::patch().to(integration::update_integration))
            .route("/{id}", web::delete().to(integration::delete_integration)),
    )
    .service(
        web::scope("/project")
            .route("", web::post().to(project::create_project))
            .route("/user", web::get().to(project::get_projects))
            .route("/{id}", web::get().to(project::get_project))
            .route("/{id}", web::patch().to(project::update_project))
            .route("/{id}", web::delete().to(project::delete_project)),
    )
    .service(
        web::scope("/workflow")
            .route("", web::post().to(workflow::create_workflow))
            .route("/user", web::get().to(workflow::get_user_workflows))
            .route("/community", web::get().to(workflow::get_community_workflows))
            .route("/{id}", web::get().to(workflow::get_workflow))
            .route("/{id}", web::patch().to(workflow::update_workflow))
            .route("/{id}", web::delete().to(workflow::delete_workflow)),
    )
    .service(
        web::scope("/docs")
            .route("/{bucket}", web::post().to(docs::upload))
            .route("/{bucket}/{file}", web::get().to(docs::download)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_unwraps_message() {
        let value = dispatch(async { Ok(Response::new(7u32)) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_dispatch_keeps_remote_class() {
        let err = dispatch(async { Err::<Response<()>, _>(Status::permission_denied("nope")) })
            .await
            .unwrap_err();
        assert_eq!(err.0.http_status(), 403);
        assert_eq!(err.0.message(), "nope");
    }

    #[tokio::test]
    async fn test_dispatch_survives_a_panicking_call() {
        let err = dispatch(async {
            if true {
                panic!("backend stub exploded");
            }
            Ok(Response::new(()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.0.http_status(), 500);
    }
}
