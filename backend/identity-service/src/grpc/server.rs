/// gRPC server implementation for identity-service
///
/// - Authentication: Register, Login (both mint a bearer token)
/// - Self-service profile: GetUser, EditUser, DeleteUser
///
/// Profile operations act on the caller's own record only. The caller id
/// comes from the propagated identity metadata, never from the message.
use crypto_core::TokenIssuer;
use doc_store::OwnedCollection;
use error_types::input::{required, supplied};
use error_types::{ServiceError, ServiceResult};
use grpc_clients::identity::{
    AuthResponse, DeleteUserRequest, EditUserRequest, GetUserRequest, LoginRequest,
    RegisterRequest, UserResponse,
};
use grpc_clients::AuthService;
use grpc_identity_propagation::CallerIdentityExt;
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::models::{User, SIGNIN_METHOD_LOCAL};
use crate::security::{hash_password_blocking, verify_password_blocking};
use crate::validators::{normalize_email, validate_email, validate_name, MAX_NAME_LENGTH};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Identity service gRPC server
#[derive(Clone)]
pub struct IdentityServiceServer {
    users: OwnedCollection<User>,
    issuer: TokenIssuer,
}

fn checked_name(value: String, field: &str) -> ServiceResult<String> {
    if validate_name(&value) {
        Ok(value)
    } else {
        Err(ServiceError::invalid_input(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )))
    }
}

fn checked_email(raw: &str) -> ServiceResult<String> {
    let email = normalize_email(raw);
    if validate_email(&email) {
        Ok(email)
    } else {
        Err(ServiceError::invalid_input("invalid email format"))
    }
}

impl IdentityServiceServer {
    pub fn new(users: OwnedCollection<User>, issuer: TokenIssuer) -> Self {
        Self { users, issuer }
    }

    fn issue_token(&self, user: &User) -> ServiceResult<String> {
        self.issuer
            .issue(&user.id)
            .map_err(|e| ServiceError::internal(format!("token signing failed: {e}")))
    }

    fn auth_response(&self, user: &User) -> ServiceResult<AuthResponse> {
        Ok(AuthResponse {
            access_token: self.issue_token(user)?,
            user: Some(user.into()),
        })
    }

    pub async fn register_user(&self, req: RegisterRequest) -> ServiceResult<AuthResponse> {
        let first_name = checked_name(required(&req.first_name, "first_name")?, "first_name")?;
        let last_name = checked_name(required(&req.last_name, "last_name")?, "last_name")?;
        let email = checked_email(&required(&req.email, "email")?)?;
        if req.password.is_empty() {
            return Err(ServiceError::invalid_input("password is required"));
        }
        let password_hash = hash_password_blocking(req.password).await?;

        // A user owns its own record, so the new id doubles as the owner
        let id = doc_store::new_id();
        let user = self
            .users
            .create_owned(&id, move |stamp| {
                Ok(User {
                    id: stamp.owner,
                    first_name,
                    last_name,
                    email,
                    password_hash,
                    signin_method: SIGNIN_METHOD_LOCAL.to_string(),
                    credits: 0,
                    created_at: stamp.now,
                    updated_at: stamp.now,
                    deleted_at: None,
                })
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        self.auth_response(&user)
    }

    pub async fn login_user(&self, req: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(ServiceError::invalid_input("email and password are required"));
        }

        let Some(user) = self.users.find_active_by_unique_key(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
        }

        info!(user_id = %user.id, "User logged in");
        self.auth_response(&user)
    }

    pub async fn edit_profile(&self, caller: &str, req: EditUserRequest) -> ServiceResult<User> {
        let first_name = supplied(req.first_name)
            .map(|v| checked_name(v, "first_name"))
            .transpose()?;
        let last_name = supplied(req.last_name)
            .map(|v| checked_name(v, "last_name"))
            .transpose()?;
        let email = supplied(req.email)
            .map(|v| checked_email(&v))
            .transpose()?;
        let password_hash = match req.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };

        self.users
            .update_owned(caller, caller, move |user| {
                if let Some(v) = first_name {
                    user.first_name = v;
                }
                if let Some(v) = last_name {
                    user.last_name = v;
                }
                if let Some(v) = email {
                    user.email = v;
                }
                if let Some(v) = password_hash {
                    user.password_hash = v;
                }
                Ok(())
            })
            .await
    }
}

#[tonic::async_trait]
impl AuthService for IdentityServiceServer {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<AuthResponse>, Status> {
        let response = self.register_user(request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(&self, request: Request<LoginRequest>) -> Result<Response<AuthResponse>, Status> {
        let response = self.login_user(request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let caller = request.caller_id()?;
        let user = self.users.get_owned(caller.as_str(), caller.as_str()).await?;

        Ok(Response::new(UserResponse {
            user: Some((&user).into()),
        }))
    }

    async fn edit_user(
        &self,
        request: Request<EditUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let caller = request.caller_id()?;
        let user = self.edit_profile(caller.as_str(), request.into_inner()).await?;

        info!(user_id = %user.id, "User updated");
        Ok(Response::new(UserResponse {
            user: Some((&user).into()),
        }))
    }

    async fn delete_user(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let caller = request.caller_id()?;
        let user = self
            .users
            .delete_owned(caller.as_str(), caller.as_str())
            .await?;

        info!(user_id = %user.id, "User deleted");
        Ok(Response::new(UserResponse {
            user: Some((&user).into()),
        }))
    }
}
