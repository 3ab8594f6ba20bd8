// Integration tests for Workflow Service gRPC API
//
// Two callers share one in-process service. Ownership and visibility are
// checked end to end through the propagated identity metadata.

use std::net::SocketAddr;

use doc_store::StoreHandle;
use grpc_clients::workflow::{
    CreateProjectRequest, CreateWorkflowRequest, DeleteProjectRequest, DeleteWorkflowRequest,
    GetProjectByIdRequest, GetProjectsRequest, GetUserWorkflowsRequest, GetWorkflowByIdRequest,
    PageRequest, UpdateProjectRequest, UpdateWorkflowRequest,
};
use grpc_clients::{WorkflowServiceClient, WorkflowServiceServer};
use grpc_identity_propagation::{CallerId, IdentityInterceptor, IdentityServerInterceptor};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, Endpoint, Server};
use tonic::Code;
use workflow_service::WorkflowServiceImpl;

type Client = WorkflowServiceClient<InterceptedService<Channel, IdentityInterceptor>>;

const ALICE: &str = "0b6f3c1e-2a44-4d7e-9a5b-6c8d9e0f1a2b";
const BOB: &str = "7e1d2c3b-4a59-4687-b9c0-d1e2f3a4b5c6";

async fn start_server() -> SocketAddr {
    let store = StoreHandle::memory();
    let service = WorkflowServiceImpl::new(store.collection(), store.collection());
    let interceptor = IdentityServerInterceptor::new(None).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        Server::builder()
            .add_service(WorkflowServiceServer::with_interceptor(service, interceptor))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    addr
}

async fn client(addr: SocketAddr, caller: Option<&str>) -> Client {
    let channel = Endpoint::from_shared(format!("http://{addr}"))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let interceptor = match caller {
        Some(id) => IdentityInterceptor::new(&CallerId::parse(id).unwrap()).unwrap(),
        None => IdentityInterceptor::anonymous(),
    };
    WorkflowServiceClient::with_interceptor(channel, interceptor)
}

fn workflow(name: &str, public: bool, project_id: Option<String>) -> CreateWorkflowRequest {
    CreateWorkflowRequest {
        name: name.into(),
        description: format!("{name} pipeline"),
        workflow_url: format!("https://flows.example.com/{name}"),
        public,
        project_id,
    }
}

#[tokio::test]
async fn test_every_owned_operation_requires_identity() {
    let addr = start_server().await;
    let mut anon = client(addr, None).await;

    let status = anon
        .create_project(CreateProjectRequest {
            title: "Ops".into(),
            description: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);

    let status = anon
        .get_user_workflows(GetUserWorkflowsRequest {})
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn test_two_users_sharing_workflows() {
    let addr = start_server().await;
    let mut alice = client(addr, Some(ALICE)).await;
    let mut bob = client(addr, Some(BOB)).await;

    let project = alice
        .create_project(CreateProjectRequest {
            title: "Ops".into(),
            description: "Runbooks".into(),
        })
        .await
        .unwrap()
        .into_inner()
        .project
        .unwrap();
    assert_eq!(project.created_by, ALICE);

    let private = alice
        .create_workflow(workflow("private", false, Some(project.id.clone())))
        .await
        .unwrap()
        .into_inner()
        .workflow
        .unwrap();
    let shared = alice
        .create_workflow(workflow("shared", true, Some(project.id.clone())))
        .await
        .unwrap()
        .into_inner()
        .workflow
        .unwrap();

    // Bob sees the public one, not the private one
    let status = bob
        .get_workflow_by_id(GetWorkflowByIdRequest {
            id: private.id.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);

    let seen = bob
        .get_workflow_by_id(GetWorkflowByIdRequest {
            id: shared.id.clone(),
        })
        .await
        .unwrap()
        .into_inner()
        .workflow
        .unwrap();
    assert_eq!(seen.id, shared.id);

    let bobs_list = bob
        .get_user_workflows(GetUserWorkflowsRequest {})
        .await
        .unwrap()
        .into_inner()
        .workflows;
    let ids: Vec<_> = bobs_list.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, [shared.id.as_str()]);

    // Visibility never grants mutation
    let status = bob
        .update_workflow(UpdateWorkflowRequest {
            id: shared.id.clone(),
            name: Some("hijacked".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);

    let status = bob
        .delete_workflow(DeleteWorkflowRequest {
            id: shared.id.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);

    // Projects are private to their owner
    let status = bob
        .get_project_by_id(GetProjectByIdRequest {
            id: project.id.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);

    let status = bob
        .update_project(UpdateProjectRequest {
            id: project.id.clone(),
            title: Some("Mine".into()),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);

    let bobs_projects = bob
        .get_projects(GetProjectsRequest {})
        .await
        .unwrap()
        .into_inner()
        .projects;
    assert!(bobs_projects.is_empty());

    // Deleting the project takes its workflows with it
    let deleted = alice
        .delete_project(DeleteProjectRequest {
            id: project.id.clone(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(deleted.deleted_workflows, 2);
    assert!(deleted.project.unwrap().deleted_at.is_some());

    let status = bob
        .get_workflow_by_id(GetWorkflowByIdRequest { id: shared.id })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = alice
        .get_project_by_id(GetProjectByIdRequest { id: project.id })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_project_view_and_listing() {
    let addr = start_server().await;
    let mut alice = client(addr, Some(ALICE)).await;

    let project = alice
        .create_project(CreateProjectRequest {
            title: "Data".into(),
            description: String::new(),
        })
        .await
        .unwrap()
        .into_inner()
        .project
        .unwrap();
    alice
        .create_workflow(workflow("etl", false, Some(project.id.clone())))
        .await
        .unwrap();
    alice
        .create_workflow(workflow("loose", false, None))
        .await
        .unwrap();

    let view = alice
        .get_project_by_id(GetProjectByIdRequest {
            id: project.id.clone(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(view.project.unwrap().title, "Data");
    assert_eq!(view.workflows.len(), 1);
    assert_eq!(view.workflows[0].name, "etl");

    let projects = alice
        .get_projects(GetProjectsRequest {})
        .await
        .unwrap()
        .into_inner()
        .projects;
    assert_eq!(projects.len(), 1);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let addr = start_server().await;
    let mut alice = client(addr, Some(ALICE)).await;

    let status = alice
        .get_workflow_by_id(GetWorkflowByIdRequest {
            id: "3f2b8c1d-0000-4000-8000-000000000000".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = alice
        .get_workflow_by_id(GetWorkflowByIdRequest {
            id: "not-an-id".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "invalid workflow id format");
}

#[tokio::test]
async fn test_community_feed_pages_public_workflows() {
    let addr = start_server().await;
    let mut alice = client(addr, Some(ALICE)).await;
    let mut bob = client(addr, Some(BOB)).await;

    for i in 0..3 {
        alice
            .create_workflow(workflow(&format!("a{i}"), true, None))
            .await
            .unwrap();
    }
    bob.create_workflow(workflow("b0", true, None)).await.unwrap();
    bob.create_workflow(workflow("b-private", false, None))
        .await
        .unwrap();

    let mut anon = client(addr, None).await;
    let first = anon
        .get_paginated_community_workflows(PageRequest {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(first.total, 4);
    let names: Vec<_> = first.workflows.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["b0", "a2", "a1"]);

    let second = anon
        .get_paginated_community_workflows(PageRequest {
            offset: 3,
            limit: 3,
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(second.workflows.len(), 1);
    assert_eq!(second.workflows[0].name, "a0");

    let status = anon
        .get_paginated_community_workflows(PageRequest {
            offset: -1,
            limit: 3,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}
