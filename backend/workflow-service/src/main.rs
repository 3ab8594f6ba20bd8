/// Workflow Service Main Entry Point
use anyhow::{Context, Result};
use doc_store::StoreHandle;
use grpc_clients::WorkflowServiceServer;
use grpc_identity_propagation::IdentityServerInterceptor;
use tokio::signal;
use tonic::transport::Server;
use tracing::{info, warn};
use workflow_service::config::Settings;
use workflow_service::WorkflowServiceImpl;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "workflow_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Workflow Service");

    let settings = Settings::load().context("Failed to load configuration")?;

    let store = StoreHandle::connect(&settings.store)
        .await
        .context("Failed to initialize document store")?;
    info!(backend = ?settings.store.backend(), "Document store ready");

    let service = WorkflowServiceImpl::new(store.collection(), store.collection());
    let interceptor = IdentityServerInterceptor::new(settings.internal_api_key.as_deref())
        .context("Invalid INTERNAL_GRPC_API_KEY")?;

    info!("Starting gRPC server on {}", settings.addr);

    Server::builder()
        .add_service(WorkflowServiceServer::with_interceptor(service, interceptor))
        .serve_with_shutdown(settings.addr, shutdown_signal())
        .await
        .context("gRPC server error")?;

    info!("Workflow service shutdown complete");
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
