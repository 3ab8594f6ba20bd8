use prost_types::Timestamp;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Project {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub title: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub created_by: String,
    #[prost(message, optional, tag = "5")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "6")]
    pub updated_at: Option<Timestamp>,
    #[prost(message, optional, tag = "7")]
    pub deleted_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Workflow {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub workflow_url: String,
    #[prost(bool, tag = "5")]
    pub public: bool,
    #[prost(string, optional, tag = "6")]
    pub project_id: Option<String>,
    #[prost(string, tag = "7")]
    pub created_by: String,
    #[prost(message, optional, tag = "8")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "9")]
    pub updated_at: Option<Timestamp>,
    #[prost(message, optional, tag = "10")]
    pub deleted_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateProjectRequest {
    #[prost(string, tag = "1")]
    pub title: String,
    #[prost(string, tag = "2")]
    pub description: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateProjectRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub title: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub description: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteProjectRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetProjectByIdRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct GetProjectsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProjectResponse {
    #[prost(message, optional, tag = "1")]
    pub project: Option<Project>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteProjectResponse {
    #[prost(message, optional, tag = "1")]
    pub project: Option<Project>,
    /// Workflows soft-deleted along with the project
    #[prost(uint32, tag = "2")]
    pub deleted_workflows: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProjectWithWorkflows {
    #[prost(message, optional, tag = "1")]
    pub project: Option<Project>,
    #[prost(message, repeated, tag = "2")]
    pub workflows: Vec<Workflow>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProjectList {
    #[prost(message, repeated, tag = "1")]
    pub projects: Vec<Project>,
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateWorkflowRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(string, tag = "3")]
    pub workflow_url: String,
    #[prost(bool, tag = "4")]
    pub public: bool,
    #[prost(string, optional, tag = "5")]
    pub project_id: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetWorkflowByIdRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateWorkflowRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub description: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub workflow_url: Option<String>,
    #[prost(bool, optional, tag = "5")]
    pub public: Option<bool>,
    #[prost(string, optional, tag = "6")]
    pub project_id: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteWorkflowRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkflowResponse {
    #[prost(message, optional, tag = "1")]
    pub workflow: Option<Workflow>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct GetUserWorkflowsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkflowList {
    #[prost(message, repeated, tag = "1")]
    pub workflows: Vec<Workflow>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkflowPage {
    #[prost(message, repeated, tag = "1")]
    pub workflows: Vec<Workflow>,
    #[prost(int64, tag = "2")]
    pub total: i64,
}
