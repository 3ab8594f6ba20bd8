use chrono::{DateTime, Utc};
use doc_store::Document;
use grpc_clients::common::to_timestamp;
use grpc_clients::integration as proto;
use serde::{Deserialize, Serialize};

/// Ingestion state of a file-based integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    NoUpload,
    Uploaded,
    Preparing,
    Failed,
    Ready,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::NoUpload => "no_upload",
            FileStatus::Uploaded => "uploaded",
            FileStatus::Preparing => "preparing",
            FileStatus::Failed => "failed",
            FileStatus::Ready => "ready",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub is_file_based: bool,
    pub file_status: FileStatus,
    pub failed_reason: Option<String>,
    pub public_base_url: String,
    pub documentation_url: String,
    pub is_locally_stored: bool,
}

impl AdditionalInfo {
    /// Locally stored files make an integration file-based, with its upload
    /// already done.
    pub fn new(public_base_url: String, documentation_url: String, is_locally_stored: bool) -> Self {
        Self {
            is_file_based: is_locally_stored,
            file_status: if is_locally_stored {
                FileStatus::Uploaded
            } else {
                FileStatus::NoUpload
            },
            failed_reason: None,
            public_base_url,
            documentation_url,
            is_locally_stored,
        }
    }
}

/// Catalog entry. `unique_name` is the slug: trimmed, lowercased and
/// unique across the catalog, deleted entries included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub display_name: String,
    pub unique_name: String,
    pub description: String,
    pub public: bool,
    pub created_by: String,
    pub additional_info: AdditionalInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Canonical slug form
pub fn normalize_unique_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl Document for Integration {
    const COLLECTION: &'static str = "integrations";
    const KIND: &'static str = "integration";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner(&self) -> &str {
        &self.created_by
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

    fn is_public(&self) -> bool {
        self.public
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.unique_name.clone())
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.display_name.as_str(),
            self.unique_name.as_str(),
            self.description.as_str(),
        ]
    }

    fn conflict_message() -> String {
        "unique_name already exists".to_string()
    }
}

impl From<&AdditionalInfo> for proto::AdditionalInfo {
    fn from(info: &AdditionalInfo) -> Self {
        Self {
            is_file_based: info.is_file_based,
            file_status: info.file_status.as_str().to_string(),
            failed_reason: info.failed_reason.clone(),
            public_base_url: info.public_base_url.clone(),
            documentation_url: info.documentation_url.clone(),
            is_locally_stored: info.is_locally_stored,
        }
    }
}

impl From<&Integration> for proto::Integration {
    fn from(integration: &Integration) -> Self {
        Self {
            id: integration.id.clone(),
            display_name: integration.display_name.clone(),
            unique_name: integration.unique_name.clone(),
            description: integration.description.clone(),
            public: integration.public,
            created_by: integration.created_by.clone(),
            additional_info: Some((&integration.additional_info).into()),
            created_at: Some(to_timestamp(integration.created_at)),
            updated_at: Some(to_timestamp(integration.updated_at)),
            deleted_at: integration.deleted_at.map(to_timestamp),
        }
    }
}
