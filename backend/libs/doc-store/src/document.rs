//! The `Document` capability trait and the metadata every store indexes on

use chrono::{DateTime, Utc};
use error_types::{ServiceError, ServiceResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// A record that lives in a collection and has an owner.
///
/// Implementors describe how to reach the fields the stores filter on and
/// the ownership layer checks. Everything else about the record is opaque
/// and travels as JSON.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Collection (table partition) name
    const COLLECTION: &'static str;

    /// Noun used in caller-facing messages ("workflow not found")
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Identifier of the principal that created the record. Set once at
    /// creation and never reassigned.
    fn owner(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_updated_at(&mut self, at: DateTime<Utc>);
    fn set_deleted_at(&mut self, at: DateTime<Utc>);

    fn is_public(&self) -> bool {
        false
    }

    /// Value that must be unique within the collection (slug, email)
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Containing record, used for cascades (a workflow's project)
    fn parent_id(&self) -> Option<&str> {
        None
    }

    /// Fields matched by free-text search
    fn search_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Message used when the unique key is already taken
    fn conflict_message() -> String {
        format!("{} already exists", Self::KIND)
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            id: self.id().to_string(),
            owner: normalize_principal(self.owner()),
            unique_key: self.unique_key(),
            parent_id: self.parent_id().map(str::to_string),
            public: self.is_public(),
            search_text: self
                .search_fields()
                .iter()
                .map(|f| f.to_lowercase())
                .collect::<Vec<_>>()
                .join("\n"),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
            deleted_at: self.deleted_at(),
        }
    }
}

/// Indexed projection of a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    pub id: String,
    /// Owner, normalized with [`normalize_principal`]
    pub owner: String,
    pub unique_key: Option<String>,
    pub parent_id: Option<String>,
    pub public: bool,
    /// Lowercased search fields joined by newlines
    pub search_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Canonical form of a principal identifier for comparisons.
pub fn normalize_principal(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Validate a caller-supplied record id.
pub fn parse_id(raw: &str, kind: &str) -> ServiceResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ServiceError::invalid_input(format!("{kind} id is required")));
    }
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ServiceError::invalid_input(format!("invalid {kind} id format")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_normalization_trims_and_folds() {
        assert_eq!(normalize_principal("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn parse_id_accepts_uuid() {
        let id = new_id();
        assert_eq!(parse_id(&format!(" {id} "), "workflow").unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        let err = parse_id("64b7f0c2e1", "project").unwrap_err();
        assert_eq!(err, ServiceError::invalid_input("invalid project id format"));

        let err = parse_id("", "project").unwrap_err();
        assert_eq!(err, ServiceError::invalid_input("project id is required"));
    }
}
