//! Query filters and pagination windows

use error_types::{ServiceError, ServiceResult};

use crate::document::{normalize_principal, DocumentMeta};

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Conjunction of conditions over [`DocumentMeta`]. Every field left as
/// `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub owner: Option<String>,
    /// Owned by this principal OR public
    pub visible_to: Option<String>,
    pub public: Option<bool>,
    pub parent_id: Option<String>,
    pub unique_key: Option<String>,
    /// Case-insensitive substring over the search fields
    pub text: Option<String>,
    pub include_deleted: bool,
}

impl Filter {
    /// Records that have not been soft-deleted
    pub fn active() -> Self {
        Self::default()
    }

    pub fn owned_by(mut self, owner: &str) -> Self {
        self.owner = Some(normalize_principal(owner));
        self
    }

    pub fn visible_to(mut self, principal: &str) -> Self {
        self.visible_to = Some(normalize_principal(principal));
        self
    }

    pub fn public_only(mut self) -> Self {
        self.public = Some(true);
        self
    }

    pub fn child_of(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn with_unique_key(mut self, key: &str) -> Self {
        self.unique_key = Some(key.to_string());
        self
    }

    pub fn containing(mut self, text: &str) -> Self {
        self.text = Some(text.trim().to_lowercase());
        self
    }

    pub fn including_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    pub fn matches(&self, meta: &DocumentMeta) -> bool {
        if !self.include_deleted && meta.deleted_at.is_some() {
            return false;
        }
        if let Some(owner) = &self.owner {
            if &meta.owner != owner {
                return false;
            }
        }
        if let Some(principal) = &self.visible_to {
            if !meta.public && &meta.owner != principal {
                return false;
            }
        }
        if let Some(public) = self.public {
            if meta.public != public {
                return false;
            }
        }
        if let Some(parent) = &self.parent_id {
            if meta.parent_id.as_deref() != Some(parent.as_str()) {
                return false;
            }
        }
        if let Some(key) = &self.unique_key {
            if meta.unique_key.as_deref() != Some(key.as_str()) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if !meta.search_text.contains(text.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Offset/limit window. Results are always ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> ServiceResult<Self> {
        if offset < 0 {
            return Err(ServiceError::invalid_input("offset must not be negative"));
        }
        if limit < 1 || limit as u64 > MAX_PAGE_LIMIT {
            return Err(ServiceError::invalid_input(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(Self {
            offset: offset as u64,
            limit: limit as u64,
        })
    }
}
