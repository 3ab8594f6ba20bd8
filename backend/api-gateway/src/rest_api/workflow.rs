/// Workflow endpoints
///
/// POST   /workflow                          - Create, optionally inside a project
/// GET    /workflow/user                     - Own plus public workflows
/// GET    /workflow/community?offset=&limit= - Public page
/// GET    /workflow/{id}                     - Owner or public
/// PATCH  /workflow/{id}                     - Update (owner only)
/// DELETE /workflow/{id}                     - Soft delete (owner only)
use actix_web::{web, HttpResponse};
use grpc_clients::workflow::{
    CreateWorkflowRequest, DeleteWorkflowRequest, GetUserWorkflowsRequest,
    GetWorkflowByIdRequest, UpdateWorkflowRequest,
};
use tracing::info;

use super::dispatch;
use super::models::{
    path_id, CreateWorkflowBody, PageQuery, UpdateWorkflowBody, WorkflowBody, WorkflowListBody,
    WorkflowPageBody,
};
use crate::error::GatewayError;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

/// A supplied project id must look like one before it travels
fn project_ref(raw: Option<String>) -> Result<Option<String>, GatewayError> {
    raw.filter(|id| !id.trim().is_empty())
        .map(|id| path_id(&id, "project"))
        .transpose()
}

pub async fn create_workflow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreateWorkflowBody>,
) -> Result<HttpResponse, GatewayError> {
    let mut body = body.into_inner();
    let project_id = project_ref(body.project_id.take())?;
    info!(user_id = %user.caller(), "POST /workflow");

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .create_workflow(CreateWorkflowRequest {
                name: body.name,
                description: body.description,
                workflow_url: body.workflow_url,
                public: body.public,
                project_id,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Created().json(WorkflowBody {
        workflow: response.workflow.map(Into::into),
    }))
}

pub async fn get_user_workflows(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, GatewayError> {
    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .get_user_workflows(GetUserWorkflowsRequest {})
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(WorkflowListBody::from(response)))
}

pub async fn get_community_workflows(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, GatewayError> {
    let page = query.validate()?;

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response =
        dispatch(async move { client.get_paginated_community_workflows(page).await }).await?;

    Ok(HttpResponse::Ok().json(WorkflowPageBody {
        workflows: response.workflows.into_iter().map(Into::into).collect(),
        total: response.total,
    }))
}

pub async fn get_workflow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "workflow")?;

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .get_workflow_by_id(GetWorkflowByIdRequest { id })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(WorkflowBody {
        workflow: response.workflow.map(Into::into),
    }))
}

pub async fn update_workflow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateWorkflowBody>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "workflow")?;
    let mut body = body.into_inner();
    let project_id = project_ref(body.project_id.take())?;
    info!(user_id = %user.caller(), workflow_id = %id, "PATCH /workflow");

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .update_workflow(UpdateWorkflowRequest {
                id,
                name: body.name,
                description: body.description,
                workflow_url: body.workflow_url,
                public: body.public,
                project_id,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(WorkflowBody {
        workflow: response.workflow.map(Into::into),
    }))
}

pub async fn delete_workflow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "workflow")?;
    info!(user_id = %user.caller(), workflow_id = %id, "DELETE /workflow");

    let mut client = state.clients.workflow(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .delete_workflow(DeleteWorkflowRequest { id })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(WorkflowBody {
        workflow: response.workflow.map(Into::into),
    }))
}
