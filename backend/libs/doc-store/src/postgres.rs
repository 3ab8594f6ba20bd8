//! PostgreSQL document store
//!
//! Every collection shares the `documents` table. The fields filters touch
//! are lifted into columns and the record itself is stored as JSONB.
//! Uniqueness of `unique_key` is enforced by a partial unique index, so the
//! check and the write are one statement.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, error, info};

use crate::config::DbConfig;
use crate::document::Document;
use crate::filter::{Filter, Page};
use crate::store::{DocumentStore, StoreError};

/// Create a PostgreSQL connection pool and verify it answers
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        "Creating database pool: service={}, max={}, min={}, acquire_timeout={}s, idle_timeout={}s",
        config.service_name,
        config.max_connections,
        config.min_connections,
        config.acquire_timeout_secs,
        config.idle_timeout_secs
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(&config.database_url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(
                service = %config.service_name,
                "Database pool created and verified successfully"
            );
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(
                service = %config.service_name,
                error = %e,
                "Database connection verification failed"
            );
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}

/// Apply the bundled schema migrations
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    let unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if unique {
        return StoreError::Conflict(err.to_string());
    }
    StoreError::Backend(err.to_string())
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, collection: &'static str, filter: &Filter) {
    qb.push(" WHERE collection = ").push_bind(collection);

    if !filter.include_deleted {
        qb.push(" AND deleted_at IS NULL");
    }
    if let Some(owner) = &filter.owner {
        qb.push(" AND owner = ").push_bind(owner.clone());
    }
    if let Some(principal) = &filter.visible_to {
        qb.push(" AND (public OR owner = ")
            .push_bind(principal.clone())
            .push(")");
    }
    if let Some(public) = filter.public {
        qb.push(" AND public = ").push_bind(public);
    }
    if let Some(parent) = &filter.parent_id {
        qb.push(" AND parent_id = ").push_bind(parent.clone());
    }
    if let Some(key) = &filter.unique_key {
        qb.push(" AND unique_key = ").push_bind(key.clone());
    }
    if let Some(text) = &filter.text {
        // strpos sidesteps LIKE wildcard escaping
        qb.push(" AND strpos(search_text, ")
            .push_bind(text.clone())
            .push(") > 0");
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for PgDocumentStore {
    async fn insert(&self, doc: &D) -> Result<(), StoreError> {
        let meta = doc.meta();
        sqlx::query(
            r#"
            INSERT INTO documents
                (collection, id, owner, unique_key, parent_id, public,
                 search_text, body, created_at, updated_at, deleted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(D::COLLECTION)
        .bind(&meta.id)
        .bind(&meta.owner)
        .bind(&meta.unique_key)
        .bind(&meta.parent_id)
        .bind(meta.public)
        .bind(&meta.search_text)
        .bind(Json(doc))
        .bind(meta.created_at)
        .bind(meta.updated_at)
        .bind(meta.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<D>, StoreError> {
        let row: Option<Json<D>> =
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = $1 AND id = $2")
                .bind(D::COLLECTION)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;

        Ok(row.map(|Json(doc)| doc))
    }

    async fn find(&self, filter: &Filter, page: Option<Page>) -> Result<Vec<D>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM documents");
        push_filter(&mut qb, D::COLLECTION, filter);
        qb.push(" ORDER BY created_at DESC, id DESC");
        if let Some(page) = page {
            qb.push(" OFFSET ")
                .push_bind(page.offset as i64)
                .push(" LIMIT ")
                .push_bind(page.limit as i64);
        }

        let rows: Vec<Json<D>> = qb
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents");
        push_filter(&mut qb, D::COLLECTION, filter);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(total.max(0) as u64)
    }

    async fn replace(&self, doc: &D) -> Result<bool, StoreError> {
        let meta = doc.meta();
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET owner = $3, unique_key = $4, parent_id = $5, public = $6,
                search_text = $7, body = $8, updated_at = $9, deleted_at = $10
            WHERE collection = $1 AND id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(D::COLLECTION)
        .bind(&meta.id)
        .bind(&meta.owner)
        .bind(&meta.unique_key)
        .bind(&meta.parent_id)
        .bind(meta.public)
        .bind(&meta.search_text)
        .bind(Json(doc))
        .bind(meta.updated_at)
        .bind(meta.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
