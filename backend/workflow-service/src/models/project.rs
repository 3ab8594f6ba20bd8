use chrono::{DateTime, Utc};
use doc_store::Document;
use grpc_clients::common::to_timestamp;
use grpc_clients::workflow as proto;
use serde::{Deserialize, Serialize};

/// A named folder of workflows, private to its creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
    const KIND: &'static str = "project";

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
}

impl From<&Project> for proto::Project {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            description: project.description.clone(),
            created_by: project.created_by.clone(),
            created_at: Some(to_timestamp(project.created_at)),
            updated_at: Some(to_timestamp(project.updated_at)),
            deleted_at: project.deleted_at.map(to_timestamp),
        }
    }
}
