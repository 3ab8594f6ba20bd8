/// Integration Service Main Entry Point
use std::sync::Arc;

use anyhow::{Context, Result};
use doc_store::StoreHandle;
use event_bus::{EventPublisher, InMemoryPublisher, RedisPublisher};
use grpc_clients::IntegrationServiceServer;
use grpc_identity_propagation::IdentityServerInterceptor;
use integration_service::config::{EventBusSettings, Settings, SERVICE_NAME};
use integration_service::{Integration, IntegrationServiceImpl};
use tokio::signal;
use tonic::transport::Server;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "integration_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Integration Service");

    let settings = Settings::load().context("Failed to load configuration")?;

    let store = StoreHandle::connect(&settings.store)
        .await
        .context("Failed to initialize document store")?;
    info!(backend = ?settings.store.backend(), "Document store ready");

    let events: Arc<dyn EventPublisher> = match &settings.events {
        EventBusSettings::Redis { url } => Arc::new(
            RedisPublisher::new(url, SERVICE_NAME)
                .await
                .context("Failed to connect to Redis")?,
        ),
        EventBusSettings::Memory => {
            warn!("Using in-process event bus - events are not delivered anywhere");
            Arc::new(InMemoryPublisher::new())
        }
    };

    let service = IntegrationServiceImpl::new(store.collection::<Integration>(), events);
    let interceptor = IdentityServerInterceptor::new(settings.internal_api_key.as_deref())
        .context("Invalid INTERNAL_GRPC_API_KEY")?;

    info!("Starting gRPC server on {}", settings.addr);

    Server::builder()
        .add_service(IntegrationServiceServer::with_interceptor(service, interceptor))
        .serve_with_shutdown(settings.addr, shutdown_signal())
        .await
        .context("gRPC server error")?;

    info!("Integration service shutdown complete");
    Ok(())
}

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
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }

    info!("Shutting down gracefully...");
}
