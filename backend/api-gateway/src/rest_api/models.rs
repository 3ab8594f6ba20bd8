//! JSON request and response bodies
//!
//! Response lists are plain `Vec`s and serialize as `[]` when empty.
//! Timestamps are RFC 3339 strings.

use chrono::{DateTime, Utc};
use grpc_clients::common::{from_timestamp, PageRequest};
use grpc_clients::{identity, integration, workflow};
use prost_types::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GatewayError;

pub const MAX_PAGE_LIMIT: i64 = 100;

fn time(ts: Option<Timestamp>) -> Option<DateTime<Utc>> {
    ts.as_ref().and_then(from_timestamp)
}

/// Reject a path id that cannot name a record before any backend call
pub fn path_id(raw: &str, kind: &str) -> Result<String, GatewayError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GatewayError::invalid_input(format!("{kind} id is required")));
    }
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| GatewayError::invalid_input(format!("invalid {kind} id format")))
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

/// `?offset=&limit=` as sent; parsed by [`PageQuery::validate`]
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn validate(&self) -> Result<PageRequest, GatewayError> {
        let (Some(offset), Some(limit)) = (self.offset.as_deref(), self.limit.as_deref()) else {
            return Err(GatewayError::invalid_input("offset and limit are required"));
        };
        let offset: i64 = offset
            .trim()
            .parse()
            .map_err(|_| GatewayError::invalid_input("invalid offset"))?;
        let limit: i64 = limit
            .trim()
            .parse()
            .map_err(|_| GatewayError::invalid_input("invalid limit"))?;

        if offset < 0 {
            return Err(GatewayError::invalid_input("offset must not be negative"));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(GatewayError::invalid_input(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(PageRequest { offset, limit })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditUserBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub signin_method: String,
    pub credits: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<identity::User> for UserDto {
    fn from(u: identity::User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            signin_method: u.signin_method,
            credits: u.credits,
            created_at: time(u.created_at),
            updated_at: time(u.updated_at),
            deleted_at: time(u.deleted_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthBody {
    pub access_token: String,
    pub user: Option<UserDto>,
}

impl From<identity::AuthResponse> for AuthBody {
    fn from(r: identity::AuthResponse) -> Self {
        Self {
            access_token: r.access_token,
            user: r.user.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserBody {
    pub user: Option<UserDto>,
}

// ---------------------------------------------------------------------------
// Integrations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateIntegrationBody {
    pub display_name: String,
    pub unique_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub public_base_url: String,
    #[serde(default)]
    pub documentation_url: String,
    #[serde(default)]
    pub is_locally_stored: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateIntegrationBody {
    pub display_name: Option<String>,
    pub unique_name: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub public_base_url: Option<String>,
    pub documentation_url: Option<String>,
    pub is_locally_stored: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdditionalInfoDto {
    pub is_file_based: bool,
    pub file_status: String,
    pub failed_reason: Option<String>,
    pub public_base_url: String,
    pub documentation_url: String,
    pub is_locally_stored: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntegrationDto {
    pub id: String,
    pub display_name: String,
    pub unique_name: String,
    pub description: String,
    pub public: bool,
    pub created_by: String,
    pub additional_info: Option<AdditionalInfoDto>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<integration::Integration> for IntegrationDto {
    fn from(i: integration::Integration) -> Self {
        Self {
            id: i.id,
            display_name: i.display_name,
            unique_name: i.unique_name,
            description: i.description,
            public: i.public,
            created_by: i.created_by,
            additional_info: i.additional_info.map(|a| AdditionalInfoDto {
                is_file_based: a.is_file_based,
                file_status: a.file_status,
                failed_reason: a.failed_reason,
                public_base_url: a.public_base_url,
                documentation_url: a.documentation_url,
                is_locally_stored: a.is_locally_stored,
            }),
            created_at: time(i.created_at),
            updated_at: time(i.updated_at),
            deleted_at: time(i.deleted_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntegrationBody {
    pub integration: Option<IntegrationDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedIntegrationBody {
    pub integration: Option<IntegrationDto>,
    pub event_published: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntegrationListBody {
    pub integrations: Vec<IntegrationDto>,
}

impl From<integration::IntegrationList> for IntegrationListBody {
    fn from(list: integration::IntegrationList) -> Self {
        Self {
            integrations: list.integrations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntegrationPageBody {
    pub integrations: Vec<IntegrationDto>,
    pub total: i64,
}

impl From<integration::IntegrationPage> for IntegrationPageBody {
    fn from(page: integration::IntegrationPage) -> Self {
        Self {
            integrations: page.integrations.into_iter().map(Into::into).collect(),
            total: page.total,
        }
    }
}

// ---------------------------------------------------------------------------
// Projects and workflows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProjectBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectBody {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkflowBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub workflow_url: String,
    #[serde(default)]
    pub public: bool,
    pub project_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkflowBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub workflow_url: Option<String>,
    pub public: Option<bool>,
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<workflow::Project> for ProjectDto {
    fn from(p: workflow::Project) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            created_by: p.created_by,
            created_at: time(p.created_at),
            updated_at: time(p.updated_at),
            deleted_at: time(p.deleted_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkflowDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub workflow_url: String,
    pub public: bool,
    pub project_id: Option<String>,
    pub created_by: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<workflow::Workflow> for WorkflowDto {
    fn from(w: workflow::Workflow) -> Self {
        Self {
            id: w.id,
            name: w.name,
            description: w.description,
            workflow_url: w.workflow_url,
            public: w.public,
            project_id: w.project_id,
            created_by: w.created_by,
            created_at: time(w.created_at),
            updated_at: time(w.updated_at),
            deleted_at: time(w.deleted_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectBody {
    pub project: Option<ProjectDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedProjectBody {
    pub project: Option<ProjectDto>,
    pub deleted_workflows: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectListBody {
    pub projects: Vec<ProjectDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectWithWorkflowsBody {
    pub project: Option<ProjectDto>,
    pub workflows: Vec<WorkflowDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkflowBody {
    pub workflow: Option<WorkflowDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkflowListBody {
    pub workflows: Vec<WorkflowDto>,
}

impl From<workflow::WorkflowList> for WorkflowListBody {
    fn from(list: workflow::WorkflowList) -> Self {
        Self {
            workflows: list.workflows.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkflowPageBody {
    pub workflows: Vec<WorkflowDto>,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadBody {
    pub message: String,
    pub file_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(offset: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            offset: offset.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_page_query_accepts_bounds() {
        let page = query(Some("0"), Some("10")).validate().unwrap();
        assert_eq!(page, PageRequest { offset: 0, limit: 10 });
        assert!(query(Some("5"), Some("100")).validate().is_ok());
    }

    #[test]
    fn test_page_query_rejections() {
        let cases = [
            (None, Some("10"), "offset and limit are required"),
            (Some("0"), None, "offset and limit are required"),
            (Some("zero"), Some("10"), "invalid offset"),
            (Some("0"), Some("ten"), "invalid limit"),
            (Some("-1"), Some("10"), "offset must not be negative"),
            (Some("0"), Some("0"), "limit must be between 1 and 100"),
            (Some("0"), Some("101"), "limit must be between 1 and 100"),
        ];
        for (offset, limit, message) in cases {
            let err = query(offset, limit).validate().unwrap_err();
            assert_eq!(err.0.message(), message);
        }
    }

    #[test]
    fn test_path_id() {
        assert!(path_id("0b6f3c1e-2a44-4d7e-9a5b-6c8d9e0f1a2b", "workflow").is_ok());
        let err = path_id("42", "workflow").unwrap_err();
        assert_eq!(err.0.message(), "invalid workflow id format");
    }

    #[test]
    fn test_empty_list_serializes_as_array() {
        let body = WorkflowListBody::from(workflow::WorkflowList::default());
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({ "workflows": [] })
        );
    }
}
