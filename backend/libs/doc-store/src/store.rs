//! The document-store collaborator interface

use async_trait::async_trait;
use error_types::ServiceError;
use thiserror::Error;

use crate::document::Document;
use crate::filter::{Filter, Page};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The record's id or unique key is already taken
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Backend(String),

    #[error("corrupt document {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ServiceError::AlreadyExists(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Persistence for one document type.
///
/// Both `insert` and `replace` enforce uniqueness of
/// [`Document::unique_key`] atomically and fail with
/// [`StoreError::Conflict`] rather than writing a duplicate. `find` results
/// are ordered by creation time, newest first.
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    async fn insert(&self, doc: &D) -> Result<(), StoreError>;

    /// Fetch by id, including soft-deleted records
    async fn find_by_id(&self, id: &str) -> Result<Option<D>, StoreError>;

    async fn find(&self, filter: &Filter, page: Option<Page>) -> Result<Vec<D>, StoreError>;

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError>;

    /// Overwrite an existing active record. Returns `false` if no record has
    /// the id or the stored record is already soft-deleted.
    async fn replace(&self, doc: &D) -> Result<bool, StoreError>;
}
