// Blog service - fetch, update and delete posts
use uuid::Uuid;

use crate::db::{BlogStore, Database};
use crate::error::Result;
use crate::models::{BlogPost, BlogPostPatch};

pub struct BlogService {
    db: Database,
}

impl BlogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<BlogPost> {
        Ok(self.db.store().find_post(id).await?)
    }

    /// Apply only the provided fields. An empty patch returns the post unchanged.
    pub async fn update_post(&self, id: Uuid, patch: BlogPostPatch) -> Result<BlogPost> {
        if patch.is_empty() {
            return self.get_post(id).await;
        }
        let post = self.db.store().update_post(id, &patch).await?;
        tracing::info!(post_id = %id, "blog post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<()> {
        self.db.store().delete_post(id).await?;
        tracing::info!(post_id = %id, "blog post deleted");
        Ok(())
    }
}
