//! Persistence seams.
//!
//! The service never caches access data between requests: every operation
//! re-reads what it needs through these traits, and concurrent upserts of the
//! same (role, page) row are last-write-wins at the storage layer.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{BlogPost, BlogPostPatch, Role, RoleAccessEntry, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RoleAccessStore: Send + Sync {
    /// All stored rows, optionally restricted to one role.
    async fn list_role_access(&self, role: Option<Role>) -> StoreResult<Vec<RoleAccessEntry>>;
    /// Insert or overwrite the full four-flag row for `(entry.role, entry.page)`.
    async fn upsert_role_access(&self, entry: &RoleAccessEntry) -> StoreResult<()>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: Uuid) -> StoreResult<User>;
    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<User>;
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn find_post(&self, id: Uuid) -> StoreResult<BlogPost>;
    async fn update_post(&self, id: Uuid, patch: &BlogPostPatch) -> StoreResult<BlogPost>;
    async fn delete_post(&self, id: Uuid) -> StoreResult<()>;
}

pub trait AdminStore: RoleAccessStore + UserStore + BlogStore {
    fn backend_name(&self) -> &'static str;
}

#[derive(Clone)]
pub struct Database {
    store: Arc<dyn AdminStore>,
}

impl Database {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let Some(url) = config.database.url.as_deref() else {
            tracing::warn!("database.url not set, falling back to the in-memory store");
            return Ok(Self::in_memory());
        };

        let store = PostgresStore::connect(url, config.database.max_connections).await?;
        tracing::info!("PostgreSQL connection pool established");

        store.run_migrations().await?;

        Ok(Self::from_store(Arc::new(store)))
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    pub fn from_store(store: Arc<dyn AdminStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn AdminStore {
        self.store.as_ref()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}
