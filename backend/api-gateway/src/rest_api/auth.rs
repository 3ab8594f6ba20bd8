/// Authentication API endpoints
///
/// POST   /auth/register - Register new user
/// POST   /auth/login    - Login user
/// GET    /auth          - Current user's profile
/// PATCH  /auth          - Edit current user
/// DELETE /auth          - Delete current user
use actix_web::{web, HttpResponse};
use grpc_clients::identity::{
    DeleteUserRequest, EditUserRequest, GetUserRequest, LoginRequest, RegisterRequest,
};
use tracing::info;

use super::dispatch;
use super::models::{AuthBody, EditUserBody, LoginBody, RegisterBody, UserBody};
use crate::error::GatewayError;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;

pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterBody>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    info!("POST /auth/register");

    let mut client = state.clients.identity(None)?;
    let response = dispatch(async move {
        client
            .register(RegisterRequest {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                password: body.password,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Created().json(AuthBody::from(response)))
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginBody>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    info!("POST /auth/login");

    let mut client = state.clients.identity(None)?;
    let response = dispatch(async move {
        client
            .login(LoginRequest {
                email: body.email,
                password: body.password,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(AuthBody::from(response)))
}

pub async fn get_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, GatewayError> {
    let mut client = state.clients.identity(Some(user.caller()))?;
    let response = dispatch(async move { client.get_user(GetUserRequest {}).await }).await?;

    Ok(HttpResponse::Ok().json(UserBody {
        user: response.user.map(Into::into),
    }))
}

pub async fn edit_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<EditUserBody>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    info!(user_id = %user.caller(), "PATCH /auth");

    let mut client = state.clients.identity(Some(user.caller()))?;
    let response = dispatch(async move {
        client
            .edit_user(EditUserRequest {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                password: body.password,
            })
            .await
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserBody {
        user: response.user.map(Into::into),
    }))
}

pub async fn delete_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, GatewayError> {
    info!(user_id = %user.caller(), "DELETE /auth");

    let mut client = state.clients.identity(Some(user.caller()))?;
    let response = dispatch(async move { client.delete_user(DeleteUserRequest {}).await }).await?;

    Ok(HttpResponse::Ok().json(UserBody {
        user: response.user.map(Into::into),
    }))
}
