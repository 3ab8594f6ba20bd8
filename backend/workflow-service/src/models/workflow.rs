use chrono::{DateTime, Utc};
use doc_store::Document;
use grpc_clients::common::to_timestamp;
use grpc_clients::workflow as proto;
use serde::{Deserialize, Serialize};

/// A workflow definition, optionally filed under one of the owner's
/// projects. Public workflows are listed in the community feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub workflow_url: String,
    pub public: bool,
    pub project_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Document for Workflow {
    const COLLECTION: &'static str = "workflows";
    const KIND: &'static str = "workflow";

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

    fn parent_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl From<&Workflow> for proto::Workflow {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            workflow_url: workflow.workflow_url.clone(),
            public: workflow.public,
            project_id: workflow.project_id.clone(),
            created_by: workflow.created_by.clone(),
            created_at: Some(to_timestamp(workflow.created_at)),
            updated_at: Some(to_timestamp(workflow.updated_at)),
            deleted_at: workflow.deleted_at.map(to_timestamp),
        }
    }
}
