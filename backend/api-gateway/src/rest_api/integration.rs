/// Integration catalog endpoints
///
/// POST   /integration                          - Create (owner = caller)
/// GET    /integration/user                     - Own plus public entries
/// GET    /integration/search?query=            - Search visible entries
/// GET    /integration/community?offset=&limit= - Public page
/// PATCH  /integration/{id}                     - Update (owner only)
/// DELETE /integration/{id}                     - Soft delete (owner only)
use actix_web::{web, HttpResponse};
use grpc_clients::integration::{
    CreateIntegrationRequest, DeleteIntegrationRequest, GetUserIntegrationsRequest,
    SearchIntegrationRequest, UpdateIntegrationRequest,
};
use tracing::info;

use super::dispatch;
use super::models::{
    path_id, CreateIntegrationBody, CreatedIntegrationBody, IntegrationBody,
    IntegrationListBody, IntegrationPageBody, PageQuery, SearchQuery, UpdateIntegrationBody,
};
use crate::error::GatewayError;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

pub async fn create_integration(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreateIntegrationBody>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    info!(user_id = %user.caller(), unique_name = %body.unique_name, "POST /integration");

    let mut client = state.clients.integration(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .create_integration(CreateIntegrationRequest {
                display_name: body.display_name,
                unique_name: body.unique_name,
                description: body.description,
                public: body.public,
                public_base_url: body.public_base_url,
                documentation_url: body.documentation_url,
                is_locally_stored: body.is_locally_stored,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Created().json(CreatedIntegrationBody {
        integration: response.integration.map(Into::into),
        event_published: response.event_published,
    }))
}

pub async fn get_user_integrations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, GatewayError> {
    let mut client = state.clients.integration(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .get_user_integrations(GetUserIntegrationsRequest {})
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(IntegrationListBody::from(response)))
}

pub async fn search_integrations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, GatewayError> {
    let query = query
        .into_inner()
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| GatewayError::invalid_input("query is required"))?;

    let mut client = state.clients.integration(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .search_integration(SearchIntegrationRequest { query })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(IntegrationListBody::from(response)))
}

pub async fn get_community_integrations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, GatewayError> {
    let page = query.validate()?;

    let mut client = state.clients.integration(Some(user.caller()))?;
    let response = dispatch(async move {
        client.get_paginated_community_integrations(page).await
    })
    .await?;

    Ok(HttpResponse::Ok().json(IntegrationPageBody::from(response)))
}

pub async fn update_integration(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateIntegrationBody>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "integration")?;
    let body = body.into_inner();
    info!(user_id = %user.caller(), integration_id = %id, "PATCH /integration");

    let mut client = state.clients.integration(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .update_integration(UpdateIntegrationRequest {
                id,
                display_name: body.display_name,
                unique_name: body.unique_name,
                description: body.description,
                public: body.public,
                public_base_url: body.public_base_url,
                documentation_url: body.documentation_url,
                is_locally_stored: body.is_locally_stored,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(IntegrationBody {
        integration: response.integration.map(Into::into),
    }))
}

pub async fn delete_integration(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let id = path_id(&path, "integration")?;
    info!(user_id = %user.caller(), integration_id = %id, "DELETE /integration");

    let mut client = state.clients.integration(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .delete_integration(DeleteIntegrationRequest { id })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(IntegrationBody {
        integration: response.integration.map(Into::into),
    }))
}
