//! gRPC server implementation for workflow-service
//!
//! Projects are private folders. Workflows are owned by their creator,
//! visible to everyone when public, and may sit in one of the owner's
//! projects. Deleting a project soft-deletes the workflows inside it.

use doc_store::{parse_id, OwnedCollection, Page};
use error_types::input::{required, supplied};
use error_types::{ServiceError, ServiceResult};
use grpc_clients::workflow::{
    CreateProjectRequest, CreateWorkflowRequest, DeleteProjectRequest, DeleteProjectResponse,
    DeleteWorkflowRequest, GetProjectByIdRequest, GetProjectsRequest, GetUserWorkflowsRequest,
    GetWorkflowByIdRequest, PageRequest, ProjectList, ProjectResponse, ProjectWithWorkflows,
    UpdateProjectRequest, UpdateWorkflowRequest, WorkflowList, WorkflowPage, WorkflowResponse,
};
use grpc_clients::WorkflowService;
use grpc_identity_propagation::CallerIdentityExt;
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::models::{Project, Workflow};

#[derive(Clone)]
pub struct WorkflowServiceImpl {
    projects: OwnedCollection<Project>,
    workflows: OwnedCollection<Workflow>,
}

fn workflow_list(items: &[Workflow]) -> WorkflowList {
    WorkflowList {
        workflows: items.iter().map(Into::into).collect(),
    }
}

impl WorkflowServiceImpl {
    pub fn new(projects: OwnedCollection<Project>, workflows: OwnedCollection<Workflow>) -> Self {
        Self {
            projects,
            workflows,
        }
    }

    /// A workflow may only be filed under an active project the caller owns
    async fn owned_project_id(&self, caller: &str, raw: &str) -> ServiceResult<String> {
        let id = parse_id(raw, "project")?;
        let project = self.projects.get_owned(caller, &id).await?;
        Ok(project.id)
    }

    pub async fn add_project(
        &self,
        caller: &str,
        req: CreateProjectRequest,
    ) -> ServiceResult<Project> {
        let title = required(&req.title, "title")?;
        let description = req.description.trim().to_string();

        let project = self
            .projects
            .create_owned(caller, move |stamp| {
                Ok(Project {
                    id: stamp.id,
                    title,
                    description,
                    created_by: stamp.owner,
                    created_at: stamp.now,
                    updated_at: stamp.now,
                    deleted_at: None,
                })
            })
            .await?;

        info!(project_id = %project.id, caller, "Project created");
        Ok(project)
    }

    pub async fn edit_project(
        &self,
        caller: &str,
        req: UpdateProjectRequest,
    ) -> ServiceResult<Project> {
        let id = parse_id(&req.id, "project")?;
        let title = supplied(req.title);
        let description = supplied(req.description);

        let project = self
            .projects
            .update_owned(caller, &id, move |project| {
                if let Some(v) = title {
                    project.title = v;
                }
                if let Some(v) = description {
                    project.description = v;
                }
                Ok(())
            })
            .await?;

        info!(project_id = %project.id, "Project updated");
        Ok(project)
    }

    /// Soft delete the project, then every active workflow filed under it.
    /// A failure part way leaves the workflows already deleted as they are.
    pub async fn remove_project(&self, caller: &str, raw_id: &str) -> ServiceResult<(Project, u32)> {
        let id = parse_id(raw_id, "project")?;
        let project = self.projects.delete_owned(caller, &id).await?;

        let deleted_workflows = match self.workflows.cascade_delete_children(&project.id).await {
            Ok(n) => n,
            Err(e) => {
                warn!(project_id = %project.id, error = %e, "Workflow cascade stopped part way");
                return Err(e);
            }
        };

        info!(project_id = %project.id, deleted_workflows, "Project deleted");
        Ok((project, deleted_workflows))
    }

    pub async fn project_with_workflows(
        &self,
        caller: &str,
        raw_id: &str,
    ) -> ServiceResult<ProjectWithWorkflows> {
        let id = parse_id(raw_id, "project")?;
        let project = self.projects.get_owned(caller, &id).await?;
        let workflows = self.workflows.list_children(&project.id).await?;

        Ok(ProjectWithWorkflows {
            project: Some((&project).into()),
            workflows: workflows.iter().map(Into::into).collect(),
        })
    }

    pub async fn add_workflow(
        &self,
        caller: &str,
        req: CreateWorkflowRequest,
    ) -> ServiceResult<Workflow> {
        let name = required(&req.name, "name")?;
        let project_id = match supplied(req.project_id) {
            Some(raw) => Some(self.owned_project_id(caller, &raw).await?),
            None => None,
        };

        let workflow = self
            .workflows
            .create_owned(caller, move |stamp| {
                Ok(Workflow {
                    id: stamp.id,
                    name,
                    description: req.description.trim().to_string(),
                    workflow_url: req.workflow_url.trim().to_string(),
                    public: req.public,
                    project_id,
                    created_by: stamp.owner,
                    created_at: stamp.now,
                    updated_at: stamp.now,
                    deleted_at: None,
                })
            })
            .await?;

        info!(workflow_id = %workflow.id, caller, "Workflow created");
        Ok(workflow)
    }

    pub async fn edit_workflow(
        &self,
        caller: &str,
        req: UpdateWorkflowRequest,
    ) -> ServiceResult<Workflow> {
        let id = parse_id(&req.id, "workflow")?;
        let name = supplied(req.name);
        let description = supplied(req.description);
        let workflow_url = supplied(req.workflow_url);
        let public = req.public;
        let project_id = match supplied(req.project_id) {
            Some(raw) => Some(self.owned_project_id(caller, &raw).await?),
            None => None,
        };

        let workflow = self
            .workflows
            .update_owned(caller, &id, move |workflow| {
                if let Some(v) = name {
                    workflow.name = v;
                }
                if let Some(v) = description {
                    workflow.description = v;
                }
                if let Some(v) = workflow_url {
                    workflow.workflow_url = v;
                }
                if let Some(v) = public {
                    workflow.public = v;
                }
                if let Some(v) = project_id {
                    workflow.project_id = Some(v);
                }
                Ok(())
            })
            .await?;

        info!(workflow_id = %workflow.id, "Workflow updated");
        Ok(workflow)
    }

    pub async fn community(&self, req: PageRequest) -> ServiceResult<WorkflowPage> {
        let page = Page::new(req.offset, req.limit)?;
        let (items, total) = self.workflows.page_public(page).await?;

        Ok(WorkflowPage {
            workflows: items.iter().map(Into::into).collect(),
            total: i64::try_from(total)
                .map_err(|_| ServiceError::internal("total count out of range"))?,
        })
    }
}

#[tonic::async_trait]
impl WorkflowService for WorkflowServiceImpl {
    async fn create_project(
        &self,
        request: Request<CreateProjectRequest>,
    ) -> Result<Response<ProjectResponse>, Status> {
        let caller = request.caller_id()?;
        let project = self.add_project(caller.as_str(), request.into_inner()).await?;

        Ok(Response::new(ProjectResponse {
            project: Some((&project).into()),
        }))
    }

    async fn update_project(
        &self,
        request: Request<UpdateProjectRequest>,
    ) -> Result<Response<ProjectResponse>, Status> {
        let caller = request.caller_id()?;
        let project = self.edit_project(caller.as_str(), request.into_inner()).await?;

        Ok(Response::new(ProjectResponse {
            project: Some((&project).into()),
        }))
    }

    async fn delete_project(
        &self,
        request: Request<DeleteProjectRequest>,
    ) -> Result<Response<DeleteProjectResponse>, Status> {
        let caller = request.caller_id()?;
        let (project, deleted_workflows) = self
            .remove_project(caller.as_str(), &request.get_ref().id)
            .await?;

        Ok(Response::new(DeleteProjectResponse {
            project: Some((&project).into()),
            deleted_workflows,
        }))
    }

    async fn get_project_by_id(
        &self,
        request: Request<GetProjectByIdRequest>,
    ) -> Result<Response<ProjectWithWorkflows>, Status> {
        let caller = request.caller_id()?;
        let body = self
            .project_with_workflows(caller.as_str(), &request.get_ref().id)
            .await?;
        Ok(Response::new(body))
    }

    async fn get_projects(
        &self,
        request: Request<GetProjectsRequest>,
    ) -> Result<Response<ProjectList>, Status> {
        let caller = request.caller_id()?;
        let projects = self.projects.list_owned(caller.as_str()).await?;

        Ok(Response::new(ProjectList {
            projects: projects.iter().map(Into::into).collect(),
        }))
    }

    async fn create_workflow(
        &self,
        request: Request<CreateWorkflowRequest>,
    ) -> Result<Response<WorkflowResponse>, Status> {
        let caller = request.caller_id()?;
        let workflow = self.add_workflow(caller.as_str(), request.into_inner()).await?;

        Ok(Response::new(WorkflowResponse {
            workflow: Some((&workflow).into()),
        }))
    }

    async fn get_workflow_by_id(
        &self,
        request: Request<GetWorkflowByIdRequest>,
    ) -> Result<Response<WorkflowResponse>, Status> {
        let caller = request.caller_id()?;
        let id = parse_id(&request.get_ref().id, "workflow")?;
        let workflow = self.workflows.get_visible(caller.as_str(), &id).await?;

        Ok(Response::new(WorkflowResponse {
            workflow: Some((&workflow).into()),
        }))
    }

    async fn update_workflow(
        &self,
        request: Request<UpdateWorkflowRequest>,
    ) -> Result<Response<WorkflowResponse>, Status> {
        let caller = request.caller_id()?;
        let workflow = self.edit_workflow(caller.as_str(), request.into_inner()).await?;

        Ok(Response::new(WorkflowResponse {
            workflow: Some((&workflow).into()),
        }))
    }

    async fn delete_workflow(
        &self,
        request: Request<DeleteWorkflowRequest>,
    ) -> Result<Response<WorkflowResponse>, Status> {
        let caller = request.caller_id()?;
        let id = parse_id(&request.get_ref().id, "workflow")?;
        let workflow = self.workflows.delete_owned(caller.as_str(), &id).await?;

        info!(workflow_id = %workflow.id, "Workflow deleted");
        Ok(Response::new(WorkflowResponse {
            workflow: Some((&workflow).into()),
        }))
    }

    async fn get_user_workflows(
        &self,
        request: Request<GetUserWorkflowsRequest>,
    ) -> Result<Response<WorkflowList>, Status> {
        let caller = request.caller_id()?;
        let workflows = self.workflows.list_visible(caller.as_str()).await?;
        Ok(Response::new(workflow_list(&workflows)))
    }

    async fn get_paginated_community_workflows(
        &self,
        request: Request<PageRequest>,
    ) -> Result<Response<WorkflowPage>, Status> {
        let page = self.community(request.into_inner()).await?;
        Ok(Response::new(page))
    }
}
