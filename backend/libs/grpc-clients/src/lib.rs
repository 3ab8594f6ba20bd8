/// gRPC Clients Library
///
/// Owns the inter-service contract: the prost message types of every
/// backend service, the generated tonic client/server stubs, and the
/// shared client pool the gateway dispatches through.
///
/// This library:
/// - Defines request/response messages for the identity, integration and
///   workflow services
/// - Generates client and server stubs (see `build.rs`)
/// - Provides lazily-connected, long-lived channels per backend
/// - Attaches the caller identity to outgoing calls
pub mod common;
pub mod config;
pub mod pool;

pub mod identity {
    mod messages;
    pub use messages::*;

    include!(concat!(env!("OUT_DIR"), "/flowgrid.identity.v1.AuthService.rs"));
}

pub mod integration {
    mod messages;
    pub use crate::common::PageRequest;
    pub use messages::*;

    include!(concat!(
        env!("OUT_DIR"),
        "/flowgrid.integration.v1.IntegrationService.rs"
    ));
}

pub mod workflow {
    mod messages;
    pub use crate::common::PageRequest;
    pub use messages::*;

    include!(concat!(
        env!("OUT_DIR"),
        "/flowgrid.workflow.v1.WorkflowService.rs"
    ));
}

pub use config::GrpcConfig;
pub use pool::{GrpcClientPool, Outbound};

pub use identity::auth_service_client::AuthServiceClient;
pub use identity::auth_service_server::{AuthService, AuthServiceServer};
pub use integration::integration_service_client::IntegrationServiceClient;
pub use integration::integration_service_server::{IntegrationService, IntegrationServiceServer};
pub use workflow::workflow_service_client::WorkflowServiceClient;
pub use workflow::workflow_service_server::{WorkflowService, WorkflowServiceServer};
