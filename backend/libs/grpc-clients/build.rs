// Build script for grpc-clients
//
// Message types are hand-written prost structs under src/ (no .proto files,
// so no protoc on the build machine). This script only generates the
// tonic client and server stubs for the three backend services; both the
// services and the gateway depend on this crate.
use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic::codec::ProstCodec";

fn unary(name: &str, route: &str, module: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::{module}::{input}"))
        .output_type(format!("crate::{module}::{output}"))
        .codec_path(CODEC)
        .build()
}

fn identity_service() -> Service {
    let m = |name, route, input, output| unary(name, route, "identity", input, output);
    Service::builder()
        .name("AuthService")
        .package("flowgrid.identity.v1")
        .method(m("register", "Register", "RegisterRequest", "AuthResponse"))
        .method(m("login", "Login", "LoginRequest", "AuthResponse"))
        .method(m("get_user", "GetUser", "GetUserRequest", "UserResponse"))
        .method(m("edit_user", "EditUser", "EditUserRequest", "UserResponse"))
        .method(m("delete_user", "DeleteUser", "DeleteUserRequest", "UserResponse"))
        .build()
}

fn integration_service() -> Service {
    let m = |name, route, input, output| unary(name, route, "integration", input, output);
    Service::builder()
        .name("IntegrationService")
        .package("flowgrid.integration.v1")
        .method(m(
            "create_integration",
            "CreateIntegration",
            "CreateIntegrationRequest",
            "CreateIntegrationResponse",
        ))
        .method(m(
            "update_integration",
            "UpdateIntegration",
            "UpdateIntegrationRequest",
            "IntegrationResponse",
        ))
        .method(m(
            "delete_integration",
            "DeleteIntegration",
            "DeleteIntegrationRequest",
            "IntegrationResponse",
        ))
        .method(m(
            "get_user_integrations",
            "GetUserIntegrations",
            "GetUserIntegrationsRequest",
            "IntegrationList",
        ))
        .method(m(
            "search_integration",
            "SearchIntegration",
            "SearchIntegrationRequest",
            "IntegrationList",
        ))
        .method(m(
            "get_paginated_community_integrations",
            "GetPaginatedCommunityIntegrations",
            "PageRequest",
            "IntegrationPage",
        ))
        .build()
}

fn workflow_service() -> Service {
    let m = |name, route, input, output| unary(name, route, "workflow", input, output);
    Service::builder()
        .name("WorkflowService")
        .package("flowgrid.workflow.v1")
        .method(m("create_project", "CreateProject", "CreateProjectRequest", "ProjectResponse"))
        .method(m("update_project", "UpdateProject", "UpdateProjectRequest", "ProjectResponse"))
        .method(m("delete_project", "DeleteProject", "DeleteProjectRequest", "DeleteProjectResponse"))
        .method(m(
            "get_project_by_id",
            "GetProjectById",
            "GetProjectByIdRequest",
            "ProjectWithWorkflows",
        ))
        .method(m("get_projects", "GetProjects", "GetProjectsRequest", "ProjectList"))
        .method(m("create_workflow", "CreateWorkflow", "CreateWorkflowRequest", "WorkflowResponse"))
        .method(m(
            "get_workflow_by_id",
            "GetWorkflowById",
            "GetWorkflowByIdRequest",
            "WorkflowResponse",
        ))
        .method(m("update_workflow", "UpdateWorkflow", "UpdateWorkflowRequest", "WorkflowResponse"))
        .method(m("delete_workflow", "DeleteWorkflow", "DeleteWorkflowRequest", "WorkflowResponse"))
        .method(m(
            "get_user_workflows",
            "GetUserWorkflows",
            "GetUserWorkflowsRequest",
            "WorkflowList",
        ))
        .method(m(
            "get_paginated_community_workflows",
            "GetPaginatedCommunityWorkflows",
            "PageRequest",
            "WorkflowPage",
        ))
        .build()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    Builder::new()
        .build_client(true)
        .build_server(true)
        .compile(&[identity_service(), integration_service(), workflow_service()]);
}
