use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::{Context, Result};
use api_gateway::config::{Config, StorageConfig};
use api_gateway::middleware::JwtAuth;
use api_gateway::rest_api;
use api_gateway::state::AppState;
use api_gateway::storage::{MemoryObjectStore, ObjectStore, S3ObjectStore};
use crypto_core::TokenVerifier;
use grpc_clients::GrpcClientPool;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::prelude::*;

fn cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_gateway=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true),
        )
        .init();

    info!("Starting API Gateway...");

    let config = Config::from_env().context("Failed to load configuration")?;

    let clients = GrpcClientPool::new(&config.grpc).context("Invalid backend endpoints")?;
    info!("Service clients initialized");

    let storage: Arc<dyn ObjectStore> = match &config.storage {
        StorageConfig::S3 { region, endpoint } => {
            Arc::new(S3ObjectStore::from_env(region.clone(), endpoint.clone()).await)
        }
        StorageConfig::Memory => {
            warn!("Using in-memory object store; uploads are lost on restart");
            Arc::new(MemoryObjectStore::new())
        }
    };

    let state = AppState::new(clients, storage, config.gateway_address.clone());
    let verifier = TokenVerifier::new(&config.jwt_secret);
    let origins = config.cors_allowed_origins.clone();

    let bind_addr = config.bind_addr();
    info!("API Gateway starting on http://{}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(JwtAuth::new(verifier.clone()))
            .wrap(cors(&origins))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(rest_api::configure)
    });
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind {bind_addr}"))?
        .run()
        .await
        .context("HTTP server error")?;

    info!("API Gateway shutdown complete");
    Ok(())
}
