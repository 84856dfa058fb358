use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields to change on a post; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl BlogPostPatch {
    /// Empty strings count as "not provided" for title and content.
    pub fn new(title: Option<String>, content: Option<String>, published: Option<bool>) -> Self {
        Self {
            title: title.filter(|t| !t.is_empty()),
            content: content.filter(|c| !c.is_empty()),
            published,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.published.is_none()
    }

    pub fn apply_to(&self, post: &mut BlogPost) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(published) = self.published {
            post.published = published;
        }
    }
}
