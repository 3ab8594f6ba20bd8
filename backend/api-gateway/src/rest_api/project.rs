/// Project endpoints
///
/// POST   /project      - Create
/// GET    /project/user - Caller's projects
/// GET    /project/{id} - Project with its workflows (owner only)
/// PATCH  /project/{id} - Update
/// DELETE /project/{id} - Soft delete, cascading to its workflows
use actix_web::{web, HttpResponse};
use grpc_clients::workflow::{
    CreateProjectRequest, DeleteProjectRequest, GetProjectByIdRequest, GetProjectsRequest,
    UpdateProjectRequest,
};
use tracing::info;

use super::dispatch;
use super::models::{
    path_id, CreateProjectBody, DeletedProjectBody, ProjectBody, ProjectListBody,
    ProjectWithWorkflowsBody, UpdateProjectBody,
};
use crate::error::GatewayError;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

pub async fn create_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreateProjectBody>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    info!(user_id = %user.caller(), "POST /project");

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .create_project(CreateProjectRequest {
                title: body.title,
                description: body.description,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Created().json(ProjectBody {
        project: response.project.map(Into::into),
    }))
}

pub async fn get_projects(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, GatewayError> {
    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move { client.get_projects(GetProjectsRequest {}).await }).await?;

    Ok(HttpResponse::Ok().json(ProjectListBody {
        projects: response.projects.into_iter().map(Into::into).collect(),
    }))
}

pub async fn get_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "project")?;

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .get_project_by_id(GetProjectByIdRequest { id })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(ProjectWithWorkflowsBody {
        project: response.project.map(Into::into),
        workflows: response.workflows.into_iter().map(Into::into).collect(),
    }))
}

pub async fn update_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateProjectBody>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "project")?;
    let body = body.into_inner();
    info!(user_id = %user.caller(), project_id = %id, "PATCH /project");

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .update_project(UpdateProjectRequest {
                id,
                title: body.title,
                description: body.description,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(ProjectBody {
        project: response.project.map(Into::into),
    }))
}

pub async fn delete_project(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "project")?;
    info!(user_id = %user.caller(), project_id = %id, "DELETE /project");

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .delete_project(DeleteProjectRequest { id })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(DeletedProjectBody {
        project: response.project.map(Into::into),
        deleted_workflows: response.deleted_workflows,
    }))
}
