use std::sync::Arc;

use grpc_clients::GrpcClientPool;

use crate::storage::ObjectStore;

/// Shared, read-only handles every handler receives
#[derive(Clone)]
pub struct AppState {
    pub clients: GrpcClientPool,
    pub storage: Arc<dyn ObjectStore>,
    /// Public base URL, without a trailing slash
    pub gateway_address: String,
}

impl AppState {
    pub fn new(
        clients: GrpcClientPool,
        storage: Arc<dyn ObjectStore>,
        gateway_address: impl Into<String>,
    ) -> Self {
        Self {
            clients,
            storage,
            gateway_address: gateway_address.into(),
        }
    }
}
