use chrono::{DateTime, Utc};
use doc_store::Document;
use grpc_clients::common::to_timestamp;
use grpc_clients::identity as proto;
use serde::{Deserialize, Serialize};

pub const SIGNIN_METHOD_LOCAL: &str = "local";

/// Stored user record. A user owns itself: the owner is the user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Normalized (trimmed, lowercased); unique across all users
    pub email: String,
    pub password_hash: String,
    pub signin_method: String,
    pub credits: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    fn conflict_message() -> String {
        "a user with this email already exists".to_string()
    }
}

impl From<&User> for proto::User {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            signin_method: user.signin_method.clone(),
            credits: user.credits,
            created_at: Some(to_timestamp(user.created_at)),
            updated_at: Some(to_timestamp(user.updated_at)),
            deleted_at: user.deleted_at.map(to_timestamp),
        }
    }
}
