//! gRPC server implementation for integration-service
//!
//! Catalog of integrations. Creation publishes `integration_created` for
//! file-based entries so the ingestion pipeline can pick them up.

use std::sync::Arc;

use doc_store::{parse_id, OwnedCollection, Page};
use error_types::input::{required, supplied};
use error_types::{ServiceError, ServiceResult};
use event_bus::{publish_json, EventPublisher};
use grpc_clients::integration::{
    CreateIntegrationRequest, CreateIntegrationResponse, DeleteIntegrationRequest,
    GetUserIntegrationsRequest, IntegrationList, IntegrationPage, IntegrationResponse,
    PageRequest, SearchIntegrationRequest, UpdateIntegrationRequest,
};
use grpc_clients::IntegrationService;
use grpc_identity_propagation::CallerIdentityExt;
use tonic::{Request, Response, Status};
use tracing::{error, info};

use crate::models::{normalize_unique_name, AdditionalInfo, Integration};

/// Topic announcing a new file-based integration
pub const INTEGRATION_CREATED_TOPIC: &str = "integration_created";

#[derive(Clone)]
pub struct IntegrationServiceImpl {
    integrations: OwnedCollection<Integration>,
    events: Arc<dyn EventPublisher>,
}

fn to_list(items: &[Integration]) -> IntegrationList {
    IntegrationList {
        integrations: items.iter().map(Into::into).collect(),
    }
}

impl IntegrationServiceImpl {
    pub fn new(integrations: OwnedCollection<Integration>, events: Arc<dyn EventPublisher>) -> Self {
        Self {
            integrations,
            events,
        }
    }

    /// Store the integration, then announce it when it is file-based.
    /// Returns the record and whether an event went out. A failed publish
    /// keeps the record.
    pub async fn create(
        &self,
        caller: &str,
        req: CreateIntegrationRequest,
    ) -> ServiceResult<(Integration, bool)> {
        let display_name = required(&req.display_name, "display_name")?;
        let unique_name = normalize_unique_name(&required(&req.unique_name, "unique_name")?);
        let additional_info = AdditionalInfo::new(
            req.public_base_url.trim().to_string(),
            req.documentation_url.trim().to_string(),
            req.is_locally_stored,
        );

        let integration = self
            .integrations
            .create_owned(caller, move |stamp| {
                Ok(Integration {
                    id: stamp.id,
                    display_name,
                    unique_name,
                    description: req.description.trim().to_string(),
                    public: req.public,
                    created_by: stamp.owner,
                    additional_info,
                    created_at: stamp.now,
                    updated_at: stamp.now,
                    deleted_at: None,
                })
            })
            .await?;

        info!(
            integration_id = %integration.id,
            unique_name = %integration.unique_name,
            "Integration created"
        );

        let published = if integration.additional_info.is_file_based {
            self.announce(&integration).await
        } else {
            false
        };
        Ok((integration, published))
    }

    async fn announce(&self, integration: &Integration) -> bool {
        match publish_json(self.events.as_ref(), INTEGRATION_CREATED_TOPIC, integration).await {
            Ok(_) => true,
            Err(e) => {
                error!(
                    integration_id = %integration.id,
                    topic = INTEGRATION_CREATED_TOPIC,
                    error = %e,
                    "Failed to publish integration event; record kept"
                );
                false
            }
        }
    }

    pub async fn update(
        &self,
        caller: &str,
        req: UpdateIntegrationRequest,
    ) -> ServiceResult<Integration> {
        let id = parse_id(&req.id, "integration")?;
        let display_name = supplied(req.display_name);
        let unique_name = supplied(req.unique_name).map(|v| normalize_unique_name(&v));
        let description = supplied(req.description);
        let public_base_url = supplied(req.public_base_url);
        let documentation_url = supplied(req.documentation_url);
        let public = req.public;
        let is_locally_stored = req.is_locally_stored;

        let updated = self
            .integrations
            .update_owned(caller, &id, move |integration| {
                if let Some(v) = display_name {
                    integration.display_name = v;
                }
                if let Some(v) = unique_name {
                    integration.unique_name = v;
                }
                if let Some(v) = description {
                    integration.description = v;
                }
                if let Some(v) = public_base_url {
                    integration.additional_info.public_base_url = v;
                }
                if let Some(v) = documentation_url {
                    integration.additional_info.documentation_url = v;
                }
                if let Some(v) = public {
                    integration.public = v;
                }
                if let Some(v) = is_locally_stored {
                    integration.additional_info.is_locally_stored = v;
                }
                Ok(())
            })
            .await?;

        info!(integration_id = %updated.id, "Integration updated");
        Ok(updated)
    }

    pub async fn community(&self, req: PageRequest) -> ServiceResult<IntegrationPage> {
        let page = Page::new(req.offset, req.limit)?;
        let (items, total) = self.integrations.page_public(page).await?;

        Ok(IntegrationPage {
            integrations: items.iter().map(Into::into).collect(),
            total: i64::try_from(total)
                .map_err(|_| ServiceError::internal("total count out of range"))?,
        })
    }
}

#[tonic::async_trait]
impl IntegrationService for IntegrationServiceImpl {
    async fn create_integration(
        &self,
        request: Request<CreateIntegrationRequest>,
    ) -> Result<Response<CreateIntegrationResponse>, Status> {
        let caller = request.caller_id()?;
        let (integration, event_published) =
            self.create(caller.as_str(), request.into_inner()).await?;

        Ok(Response::new(CreateIntegrationResponse {
            integration: Some((&integration).into()),
            event_published,
        }))
    }

    async fn update_integration(
        &self,
        request: Request<UpdateIntegrationRequest>,
    ) -> Result<Response<IntegrationResponse>, Status> {
        let caller = request.caller_id()?;
        let integration = self.update(caller.as_str(), request.into_inner()).await?;

        Ok(Response::new(IntegrationResponse {
            integration: Some((&integration).into()),
        }))
    }

    async fn delete_integration(
        &self,
        request: Request<DeleteIntegrationRequest>,
    ) -> Result<Response<IntegrationResponse>, Status> {
        let caller = request.caller_id()?;
        let id = parse_id(&request.get_ref().id, "integration")?;
        let integration = self.integrations.delete_owned(caller.as_str(), &id).await?;

        info!(integration_id = %integration.id, "Integration deleted");
        Ok(Response::new(IntegrationResponse {
            integration: Some((&integration).into()),
        }))
    }

    async fn get_user_integrations(
        &self,
        request: Request<GetUserIntegrationsRequest>,
    ) -> Result<Response<IntegrationList>, Status> {
        let caller = request.caller_id()?;
        let items = self.integrations.list_visible(caller.as_str()).await?;
        Ok(Response::new(to_list(&items)))
    }

    async fn search_integration(
        &self,
        request: Request<SearchIntegrationRequest>,
    ) -> Result<Response<IntegrationList>, Status> {
        let caller = request.caller_id()?;
        let items = self
            .integrations
            .search_visible(caller.as_str(), &request.get_ref().query)
            .await?;
        Ok(Response::new(to_list(&items)))
    }

    async fn get_paginated_community_integrations(
        &self,
        request: Request<PageRequest>,
    ) -> Result<Response<IntegrationPage>, Status> {
        let page = self.community(request.into_inner()).await?;
        Ok(Response::new(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use doc_store::StoreHandle;
    use event_bus::{InMemoryPublisher, PublishError};
    use mockall::mock;

    mock! {
        pub Bus {}

        #[async_trait]
        impl EventPublisher for Bus {
            async fn publish(&self, topic: &str, payload: String) -> event_bus::Result<usize>;
        }
    }

    fn create_request(unique_name: &str, is_locally_stored: bool) -> CreateIntegrationRequest {
        CreateIntegrationRequest {
            display_name: "Slack".into(),
            unique_name: unique_name.into(),
            description: "Team chat".into(),
            public: false,
            public_base_url: "https://slack.com/api".into(),
            documentation_url: "https://api.slack.com".into(),
            is_locally_stored,
        }
    }

    fn service_with(events: Arc<dyn EventPublisher>) -> IntegrationServiceImpl {
        IntegrationServiceImpl::new(StoreHandle::memory().collection(), events)
    }

    #[tokio::test]
    async fn test_file_based_creation_publishes_record() {
        let bus = InMemoryPublisher::new();
        let svc = service_with(Arc::new(bus.clone()));

        let (integration, published) = svc
            .create("alice", create_request(" Slack ", true))
            .await
            .unwrap();
        assert!(published);
        assert_eq!(integration.unique_name, "slack");
        assert_eq!(integration.created_by, "alice");

        let events = bus.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic, INTEGRATION_CREATED_TOPIC);
        let payload: serde_json::Value = serde_json::from_str(&events[0].payload).unwrap();
        assert_eq!(payload["unique_name"], "slack");
        assert_eq!(payload["additional_info"]["file_status"], "uploaded");
    }

    #[tokio::test]
    async fn test_plain_creation_publishes_nothing() {
        let mut bus = MockBus::new();
        bus.expect_publish().times(0);
        let svc = service_with(Arc::new(bus));

        let (_, published) = svc.create("alice", create_request("slack", false)).await.unwrap();
        assert!(!published);
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_record() {
        let mut bus = MockBus::new();
        bus.expect_publish()
            .times(1)
            .returning(|_, _| Err(PublishError::Rejected("bus down".into())));
        let svc = service_with(Arc::new(bus));

        let (integration, published) = svc.create("alice", create_request("slack", true)).await.unwrap();
        assert!(!published);

        let stored = svc.integrations.get_active(&integration.id).await.unwrap();
        assert_eq!(stored, integration);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected_even_across_owners() {
        let svc = service_with(Arc::new(InMemoryPublisher::new()));
        svc.create("alice", create_request("slack", false)).await.unwrap();

        let err = svc
            .create("bob", create_request("SLACK", false))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::AlreadyExists("unique_name already exists".into()));
    }

    #[tokio::test]
    async fn test_update_applies_supplied_fields_only() {
        let svc = service_with(Arc::new(InMemoryPublisher::new()));
        let (created, _) = svc.create("alice", create_request("slack", false)).await.unwrap();

        let updated = svc
            .update(
                "alice",
                UpdateIntegrationRequest {
                    id: created.id.clone(),
                    description: Some("  ".into()),
                    public: Some(true),
                    unique_name: Some(" Slack-V2 ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description, "Team chat");
        assert!(updated.public);
        assert_eq!(updated.unique_name, "slack-v2");
        assert!(!updated.additional_info.is_locally_stored);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_by_non_owner_denied() {
        let svc = service_with(Arc::new(InMemoryPublisher::new()));
        let (created, _) = svc.create("alice", create_request("slack", false)).await.unwrap();

        let err = svc
            .update(
                "bob",
                UpdateIntegrationRequest {
                    id: created.id.clone(),
                    display_name: Some("Hijacked".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::not_owner());
    }

    #[tokio::test]
    async fn test_community_page_bounds() {
        let svc = service_with(Arc::new(InMemoryPublisher::new()));
        let err = svc
            .community(PageRequest {
                offset: 0,
                limit: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
