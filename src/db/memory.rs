//! In-memory store for local runs and tests.
//!
//! Not durable: state is lost on restart, and separate processes do not share
//! it. Each map sits behind its own `RwLock`; writes to the same key are
//! last-write-wins.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AdminStore, BlogStore, RoleAccessStore, StoreError, StoreResult, UserStore};
use crate::models::{BlogPost, BlogPostPatch, PageAccess, Role, RoleAccessEntry, User};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    role_access: Arc<RwLock<HashMap<(Role, String), PageAccess>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    posts: Arc<RwLock<HashMap<Uuid, BlogPost>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn insert_post(&self, post: BlogPost) {
        self.posts.write().await.insert(post.id, post);
    }
}

#[async_trait]
impl RoleAccessStore for InMemoryStore {
    async fn list_role_access(&self, role: Option<Role>) -> StoreResult<Vec<RoleAccessEntry>> {
        let rows = self.role_access.read().await;
        let mut entries: Vec<RoleAccessEntry> = rows
            .iter()
            .filter(|((r, _), _)| role.map_or(true, |wanted| *r == wanted))
            .map(|((r, page), access)| RoleAccessEntry {
                role: *r,
                page: page.clone(),
                access: *access,
            })
            .collect();
        entries.sort_by(|a, b| (a.role, &a.page).cmp(&(b.role, &b.page)));
        Ok(entries)
    }

    async fn upsert_role_access(&self, entry: &RoleAccessEntry) -> StoreResult<()> {
        self.role_access
            .write()
            .await
            .insert((entry.role, entry.page.clone()), entry.access);
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.email.cmp(&b.email)));
        Ok(users)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        user.role = role;
        Ok(user.clone())
    }
}

#[async_trait]
impl BlogStore for InMemoryStore {
    async fn find_post(&self, id: Uuid) -> StoreResult<BlogPost> {
        self.posts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("post {}", id)))
    }

    async fn update_post(&self, id: Uuid, patch: &BlogPostPatch) -> StoreResult<BlogPost> {
        let mut posts = self.posts.write().await;
        let post = posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("post {}", id)))?;
        patch.apply_to(post);
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<()> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("post {}", id)))
    }
}

impl AdminStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: Role, page: &str, access: PageAccess) -> RoleAccessEntry {
        RoleAccessEntry {
            role,
            page: page.into(),
            access,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_the_whole_row() {
        let store = InMemoryStore::new();
        store
            .upsert_role_access(&entry(Role::Editor, "/blog", PageAccess::FULL))
            .await
            .unwrap();
        store
            .upsert_role_access(&entry(Role::Editor, "/blog", PageAccess::VIEW_ONLY))
            .await
            .unwrap();

        let rows = store.list_role_access(None).await.unwrap();
        assert_eq!(rows, vec![entry(Role::Editor, "/blog", PageAccess::VIEW_ONLY)]);
    }

    #[tokio::test]
    async fn list_filters_by_role() {
        let store = InMemoryStore::new();
        store
            .upsert_role_access(&entry(Role::Editor, "/blog", PageAccess::FULL))
            .await
            .unwrap();
        store
            .upsert_role_access(&entry(Role::Viewer, "/blog", PageAccess::VIEW_ONLY))
            .await
            .unwrap();

        let viewer_rows = store.list_role_access(Some(Role::Viewer)).await.unwrap();
        assert_eq!(viewer_rows.len(), 1);
        assert_eq!(viewer_rows[0].role, Role::Viewer);
        assert_eq!(store.list_role_access(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get_user(id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.set_user_role(id, Role::Admin).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete_post(id).await, Err(StoreError::NotFound(_))));
    }
}
