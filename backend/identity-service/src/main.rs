/// Identity Service Main Entry Point
///
/// Starts the gRPC server with:
/// - the configured document store (PostgreSQL or in-memory)
/// - the token issuer holding the shared signing secret
/// - the identity interceptor (internal API key + caller id extraction)
use anyhow::{Context, Result};
use crypto_core::TokenIssuer;
use doc_store::StoreHandle;
use grpc_clients::AuthServiceServer;
use grpc_identity_propagation::IdentityServerInterceptor;
use identity_service::{config::Settings, IdentityServiceServer, User};
use tokio::signal;
use tonic::transport::Server;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "identity_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Identity Service");

    let settings = Settings::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let store = StoreHandle::connect(&settings.store)
        .await
        .context("Failed to initialize document store")?;
    info!(backend = ?settings.store.backend(), "Document store ready");

    let identity_service = IdentityServiceServer::new(
        store.collection::<User>(),
        TokenIssuer::new(&settings.jwt.secret),
    );

    if settings.internal_api_key.is_none() {
        warn!("INTERNAL_GRPC_API_KEY not set - accepting calls without an internal key");
    }
    let interceptor = IdentityServerInterceptor::new(settings.internal_api_key.as_deref())
        .context("Invalid INTERNAL_GRPC_API_KEY")?;

    let addr = settings.server.addr()?;
    info!("Starting gRPC server on {}", addr);

    Server::builder()
        .add_service(AuthServiceServer::with_interceptor(
            identity_service,
            interceptor,
        ))
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .context("gRPC server error")?;

    info!("Identity service shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
