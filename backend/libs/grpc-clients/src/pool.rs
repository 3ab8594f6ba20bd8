/// Shared backend channels
///
/// One long-lived, lazily-connected channel per backend service, created
/// once at gateway startup and shared by every request. Channels are cheap
/// to clone (they are handles onto the same HTTP/2 connection), so each
/// request builds its own typed client with its own identity interceptor.
///
/// A backend that is down at startup does not block the gateway: the
/// channel connects on first use and the failure surfaces per request.
use grpc_identity_propagation::{CallerId, IdentityInterceptor};
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tonic::Status;
use tracing::info;

use crate::config::{ConfigError, GrpcConfig};
use crate::{AuthServiceClient, IntegrationServiceClient, WorkflowServiceClient};

/// Transport used by every outgoing client
pub type Outbound = InterceptedService<Channel, IdentityInterceptor>;

#[derive(Clone)]
pub struct GrpcClientPool {
    identity: Channel,
    integration: Channel,
    workflow: Channel,
    internal_api_key: Option<String>,
}

impl GrpcClientPool {
    /// Build the pool. Must be called from within a tokio runtime.
    pub fn new(config: &GrpcConfig) -> Result<Self, ConfigError> {
        let connect = |url: &str, name: &str| -> Result<Channel, ConfigError> {
            let channel = config.make_endpoint(url)?.connect_lazy();
            info!(service = name, url, "gRPC channel configured (lazy connect)");
            Ok(channel)
        };

        Ok(Self {
            identity: connect(&config.identity_service_url, "identity-service")?,
            integration: connect(&config.integration_service_url, "integration-service")?,
            workflow: connect(&config.workflow_service_url, "workflow-service")?,
            internal_api_key: config.internal_api_key.clone(),
        })
    }

    fn interceptor(&self, caller: Option<&CallerId>) -> Result<IdentityInterceptor, Status> {
        let interceptor = match caller {
            Some(caller) => IdentityInterceptor::new(caller)?,
            None => IdentityInterceptor::anonymous(),
        };
        interceptor.with_internal_key(self.internal_api_key.as_deref())
    }

    /// Identity service client; `None` for calls that carry no caller
    /// (registration, login).
    pub fn identity(
        &self,
        caller: Option<&CallerId>,
    ) -> Result<AuthServiceClient<Outbound>, Status> {
        Ok(AuthServiceClient::with_interceptor(
            self.identity.clone(),
            self.interceptor(caller)?,
        ))
    }

    pub fn integration(
        &self,
        caller: Option<&CallerId>,
    ) -> Result<IntegrationServiceClient<Outbound>, Status> {
        Ok(IntegrationServiceClient::with_interceptor(
            self.integration.clone(),
            self.interceptor(caller)?,
        ))
    }

    pub fn workflow(
        &self,
        caller: Option<&CallerId>,
    ) -> Result<WorkflowServiceClient<Outbound>, Status> {
        Ok(WorkflowServiceClient::with_interceptor(
            self.workflow.clone(),
            self.interceptor(caller)?,
        ))
    }
}
