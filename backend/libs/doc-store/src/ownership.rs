//! Ownership-checked operations over one collection
//!
//! Every service reaches its documents through [`OwnedCollection`], so the
//! rules below hold for users, integrations, projects and workflows alike:
//!
//! - the owner is taken from the propagated caller id at creation and is
//!   never reassigned afterwards
//! - a missing record and a soft-deleted one both read as `NotFound`
//! - mutation and deletion require `owner == caller` (trimmed, case-folded),
//!   otherwise `PermissionDenied`
//! - deletion is a soft delete and is one-way
//! - `updated_at` strictly increases on every successful update

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use error_types::{ServiceError, ServiceResult};
use tracing::{debug, warn};

use crate::document::{new_id, normalize_principal, Document};
use crate::filter::{Filter, Page};
use crate::store::{DocumentStore, StoreError};

/// Values the collection assigns to a new record
#[derive(Debug, Clone)]
pub struct Stamp {
    pub id: String,
    pub owner: String,
    pub now: DateTime<Utc>,
}

pub struct OwnedCollection<D: Document> {
    store: Arc<dyn DocumentStore<D>>,
}

impl<D: Document> Clone for OwnedCollection<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn store_error<D: Document>(err: StoreError) -> ServiceError {
    match err {
        StoreError::Conflict(detail) => {
            debug!(collection = D::COLLECTION, %detail, "unique key conflict");
            ServiceError::AlreadyExists(D::conflict_message())
        }
        other => {
            warn!(collection = D::COLLECTION, error = %other, "document store failure");
            other.into()
        }
    }
}

/// Next `updated_at`, never equal to or before `previous`
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    let floor = previous + Duration::microseconds(1);
    if now > floor {
        now
    } else {
        floor
    }
}

pub fn is_owner<D: Document>(doc: &D, caller: &str) -> bool {
    normalize_principal(doc.owner()) == normalize_principal(caller)
}

impl<D: Document> OwnedCollection<D> {
    pub fn new(store: Arc<dyn DocumentStore<D>>) -> Self {
        Self { store }
    }

    fn not_found() -> ServiceError {
        ServiceError::not_found(D::KIND)
    }

    /// Insert a new record owned by `owner`. `build` receives the id, the
    /// owner and the creation instant; a record whose owner differs from
    /// the one handed in is refused.
    pub async fn create_owned<F>(&self, owner: &str, build: F) -> ServiceResult<D>
    where
        F: FnOnce(Stamp) -> ServiceResult<D> + Send,
    {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ServiceError::unauthenticated("missing caller identity"));
        }

        let doc = build(Stamp {
            id: new_id(),
            owner: owner.to_string(),
            now: Utc::now(),
        })?;
        if !is_owner(&doc, owner) {
            return Err(ServiceError::internal(format!(
                "{} built with a foreign owner",
                D::KIND
            )));
        }

        self.store.insert(&doc).await.map_err(store_error::<D>)?;
        debug!(collection = D::COLLECTION, id = doc.id(), "document created");
        Ok(doc)
    }

    /// Load an active record. Absent and soft-deleted are both `NotFound`.
    pub async fn get_active(&self, id: &str) -> ServiceResult<D> {
        match self.store.find_by_id(id).await.map_err(store_error::<D>)? {
            Some(doc) if !doc.is_deleted() => Ok(doc),
            _ => Err(Self::not_found()),
        }
    }

    pub fn ensure_owner(&self, doc: &D, caller: &str) -> ServiceResult<()> {
        if is_owner(doc, caller) {
            Ok(())
        } else {
            debug!(collection = D::COLLECTION, id = doc.id(), "caller is not the owner");
            Err(ServiceError::not_owner())
        }
    }

    pub async fn get_owned(&self, caller: &str, id: &str) -> ServiceResult<D> {
        let doc = self.get_active(id).await?;
        self.ensure_owner(&doc, caller)?;
        Ok(doc)
    }

    /// Load a record the caller owns or that is public
    pub async fn get_visible(&self, caller: &str, id: &str) -> ServiceResult<D> {
        let doc = self.get_active(id).await?;
        if doc.is_public() {
            return Ok(doc);
        }
        self.ensure_owner(&doc, caller)?;
        Ok(doc)
    }

    /// Apply `mutate` to a record the caller owns and return the stored
    /// result. A mutation that changes the id or owner is refused.
    pub async fn update_owned<F>(&self, caller: &str, id: &str, mutate: F) -> ServiceResult<D>
    where
        F: FnOnce(&mut D) -> ServiceResult<()> + Send,
    {
        let current = self.get_owned(caller, id).await?;
        let mut next = current.clone();
        mutate(&mut next)?;

        if next.id() != current.id() || !is_owner(&next, current.owner()) {
            return Err(ServiceError::internal(format!(
                "{} update may not change id or owner",
                D::KIND
            )));
        }

        next.set_updated_at(advance(current.updated_at()));
        if !self.store.replace(&next).await.map_err(store_error::<D>)? {
            return Err(Self::not_found());
        }

        self.get_active(id).await
    }

    /// Soft delete a record the caller owns and return it as deleted
    pub async fn delete_owned(&self, caller: &str, id: &str) -> ServiceResult<D> {
        let mut doc = self.get_owned(caller, id).await?;
        self.mark_deleted(&mut doc).await?;
        debug!(collection = D::COLLECTION, id, "document soft-deleted");
        Ok(doc)
    }

    async fn mark_deleted(&self, doc: &mut D) -> ServiceResult<()> {
        let at = advance(doc.updated_at());
        doc.set_deleted_at(at);
        doc.set_updated_at(at);
        if !self.store.replace(doc).await.map_err(store_error::<D>)? {
            return Err(Self::not_found());
        }
        Ok(())
    }

    pub async fn list_owned(&self, owner: &str) -> ServiceResult<Vec<D>> {
        self.find(Filter::active().owned_by(owner), None).await
    }

    /// Records the principal owns plus every public record
    pub async fn list_visible(&self, principal: &str) -> ServiceResult<Vec<D>> {
        self.find(Filter::active().visible_to(principal), None).await
    }

    pub async fn list_children(&self, parent_id: &str) -> ServiceResult<Vec<D>> {
        self.find(Filter::active().child_of(parent_id), None).await
    }

    /// Soft delete every active child of `parent_id`. Stops at the first
    /// failure; records already deleted stay deleted.
    pub async fn cascade_delete_children(&self, parent_id: &str) -> ServiceResult<u32> {
        let children = self.list_children(parent_id).await?;
        let mut deleted = 0u32;
        for mut child in children {
            self.mark_deleted(&mut child).await?;
            deleted += 1;
        }
        debug!(collection = D::COLLECTION, parent_id, deleted, "cascade soft delete");
        Ok(deleted)
    }

    /// One page of public records, newest first, with the total count
    pub async fn page_public(&self, page: Page) -> ServiceResult<(Vec<D>, u64)> {
        let filter = Filter::active().public_only();
        let total = self.store.count(&filter).await.map_err(store_error::<D>)?;
        let items = self.find(filter, Some(page)).await?;
        Ok((items, total))
    }

    /// Case-insensitive substring search over records visible to `principal`
    pub async fn search_visible(&self, principal: &str, text: &str) -> ServiceResult<Vec<D>> {
        if text.trim().is_empty() {
            return Err(ServiceError::invalid_input("search query is required"));
        }
        self.find(Filter::active().visible_to(principal).containing(text), None)
            .await
    }

    pub async fn find_active_by_unique_key(&self, key: &str) -> ServiceResult<Option<D>> {
        let mut found = self.find(Filter::active().with_unique_key(key), None).await?;
        Ok(found.pop())
    }

    async fn find(&self, filter: Filter, page: Option<Page>) -> ServiceResult<Vec<D>> {
        self.store.find(&filter, page).await.map_err(store_error::<D>)
    }
}
