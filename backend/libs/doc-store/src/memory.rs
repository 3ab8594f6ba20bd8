//! In-process document store
//!
//! Backs local development and every test suite. All collections share one
//! lock; uniqueness checks and the write they guard happen under the same
//! write guard, so concurrent inserts of the same key cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::document::{Document, DocumentMeta};
use crate::filter::{Filter, Page};
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    meta: DocumentMeta,
    body: Value,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, Vec<Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode<D: Document>(doc: &D) -> Result<Entry, StoreError> {
        let body = serde_json::to_value(doc).map_err(|e| StoreError::Corrupt {
            id: doc.id().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Entry {
            meta: doc.meta(),
            body,
        })
    }

    fn decode<D: Document>(entry: &Entry) -> Result<D, StoreError> {
        serde_json::from_value(entry.body.clone()).map_err(|e| StoreError::Corrupt {
            id: entry.meta.id.clone(),
            reason: e.to_string(),
        })
    }

    fn key_taken(entries: &[Entry], meta: &DocumentMeta) -> bool {
        let Some(key) = &meta.unique_key else {
            return false;
        };
        entries
            .iter()
            .any(|e| e.meta.id != meta.id && e.meta.unique_key.as_ref() == Some(key))
    }

    /// Matching entries, newest first
    fn select<'a>(entries: &'a [Entry], filter: &Filter) -> Vec<&'a Entry> {
        let mut matched: Vec<&Entry> = entries.iter().filter(|e| filter.matches(&e.meta)).collect();
        matched.sort_by(|a, b| {
            b.meta
                .created_at
                .cmp(&a.meta.created_at)
                .then_with(|| b.meta.id.cmp(&a.meta.id))
        });
        matched
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for MemoryStore {
    async fn insert(&self, doc: &D) -> Result<(), StoreError> {
        let entry = Self::encode(doc)?;
        let mut collections = self.collections.write().await;
        let entries = collections.entry(D::COLLECTION).or_default();

        if entries.iter().any(|e| e.meta.id == entry.meta.id) {
            return Err(StoreError::Conflict(format!("duplicate id {}", entry.meta.id)));
        }
        if Self::key_taken(entries, &entry.meta) {
            return Err(StoreError::Conflict(format!(
                "duplicate unique key in {}",
                D::COLLECTION
            )));
        }

        entries.push(entry);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<D>, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(D::COLLECTION)
            .and_then(|entries| entries.iter().find(|e| e.meta.id == id))
            .map(Self::decode)
            .transpose()
    }

    async fn find(&self, filter: &Filter, page: Option<Page>) -> Result<Vec<D>, StoreError> {
        let collections = self.collections.read().await;
        let Some(entries) = collections.get(D::COLLECTION) else {
            return Ok(Vec::new());
        };

        let (skip, take) = page
            .map(|p| (p.offset as usize, p.limit as usize))
            .unwrap_or((0, usize::MAX));

        Self::select(entries, filter)
            .into_iter()
            .skip(skip)
            .take(take)
            .map(Self::decode)
            .collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(D::COLLECTION)
            .map(|entries| entries.iter().filter(|e| filter.matches(&e.meta)).count() as u64)
            .unwrap_or(0))
    }

    async fn replace(&self, doc: &D) -> Result<bool, StoreError> {
        let entry = Self::encode(doc)?;
        let mut collections = self.collections.write().await;
        let Some(entries) = collections.get_mut(D::COLLECTION) else {
            return Ok(false);
        };

        if Self::key_taken(entries, &entry.meta) {
            return Err(StoreError::Conflict(format!(
                "duplicate unique key in {}",
                D::COLLECTION
            )));
        }

        match entries.iter_mut().find(|e| e.meta.id == entry.meta.id) {
            Some(slot) if slot.meta.deleted_at.is_some() => Ok(false),
            Some(slot) => {
                *slot = entry;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
