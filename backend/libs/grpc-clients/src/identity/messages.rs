use prost_types::Timestamp;

/// Public projection of a user record; never carries the password hash
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct User {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub first_name: String,
    #[prost(string, tag = "3")]
    pub last_name: String,
    #[prost(string, tag = "4")]
    pub email: String,
    #[prost(string, tag = "5")]
    pub signin_method: String,
    #[prost(int64, tag = "6")]
    pub credits: i64,
    #[prost(message, optional, tag = "7")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "8")]
    pub updated_at: Option<Timestamp>,
    #[prost(message, optional, tag = "9")]
    pub deleted_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RegisterRequest {
    #[prost(string, tag = "1")]
    pub first_name: String,
    #[prost(string, tag = "2")]
    pub last_name: String,
    #[prost(string, tag = "3")]
    pub email: String,
    #[prost(string, tag = "4")]
    pub password: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

/// Returned by both register and login
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthResponse {
    #[prost(string, tag = "1")]
    pub access_token: String,
    #[prost(message, optional, tag = "2")]
    pub user: Option<User>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct GetUserRequest {}

/// Only supplied, non-blank fields are applied
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EditUserRequest {
    #[prost(string, optional, tag = "1")]
    pub first_name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub last_name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub email: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub password: Option<String>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct DeleteUserRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UserResponse {
    #[prost(message, optional, tag = "1")]
    pub user: Option<User>,
}
