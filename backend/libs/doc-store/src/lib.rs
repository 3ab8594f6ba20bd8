//! Document storage shared by the backend services
//!
//! Services describe their records with [`Document`] and reach them only
//! through [`OwnedCollection`], which carries the ownership, soft-delete and
//! visibility rules. Two stores implement [`DocumentStore`]: PostgreSQL for
//! deployments and an in-process store for development and tests.
//!
//! ```ignore
//! let handle = StoreHandle::connect(&StoreConfig::from_env("workflow-service")?).await?;
//! let workflows: OwnedCollection<Workflow> = handle.collection();
//! let mine = workflows.list_visible(caller.as_str()).await?;
//! ```

pub mod config;
pub mod document;
pub mod filter;
pub mod memory;
pub mod ownership;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use tracing::info;

pub use config::{DbConfig, StoreBackend, StoreConfig, StoreConfigError};
pub use document::{new_id, normalize_principal, parse_id, Document, DocumentMeta};
pub use filter::{Filter, Page, MAX_PAGE_LIMIT};
pub use memory::MemoryStore;
pub use ownership::{is_owner, OwnedCollection, Stamp};
pub use postgres::{create_pool, migrate, PgDocumentStore};
pub use store::{DocumentStore, StoreError};

/// A connected store, cheap to clone, that hands out typed collections
#[derive(Debug, Clone)]
pub enum StoreHandle {
    Memory(Arc<MemoryStore>),
    Postgres(PgDocumentStore),
}

impl StoreHandle {
    pub fn memory() -> Self {
        Self::Memory(Arc::new(MemoryStore::new()))
    }

    /// Connect the configured backend. Postgres runs migrations first when
    /// `run_migrations` is set.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        match config {
            StoreConfig::Memory => {
                info!("Using in-memory document store");
                Ok(Self::memory())
            }
            StoreConfig::Postgres(db) => {
                let pool = create_pool(db)
                    .await
                    .map_err(|e| StoreError::Backend(format!("database connection failed: {e}")))?;
                if db.run_migrations {
                    migrate(&pool)
                        .await
                        .map_err(|e| StoreError::Backend(format!("migration failed: {e}")))?;
                }
                Ok(Self::Postgres(PgDocumentStore::new(pool)))
            }
        }
    }

    pub fn collection<D: Document>(&self) -> OwnedCollection<D> {
        let store: Arc<dyn DocumentStore<D>> = match self {
            Self::Memory(store) => store.clone(),
            Self::Postgres(store) => Arc::new(store.clone()),
        };
        OwnedCollection::new(store)
    }
}
