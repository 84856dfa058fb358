// Postgres-backed store
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{AdminStore, BlogStore, RoleAccessStore, StoreError, StoreResult, UserStore};
use crate::models::{BlogPost, BlogPostPatch, PageAccess, Role, RoleAccessEntry, User};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct RoleAccessRow {
    role: String,
    page: String,
    can_view: bool,
    can_add: bool,
    can_edit: bool,
    can_delete: bool,
}

impl RoleAccessRow {
    fn into_entry(self) -> Option<RoleAccessEntry> {
        let role = match self.role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!(page = %self.page, "skipping role access row: {}", e);
                return None;
            }
        };
        Some(RoleAccessEntry {
            role,
            page: self.page,
            access: PageAccess {
                can_view: self.can_view,
                can_add: self.can_add,
                can_edit: self.can_edit,
                can_delete: self.can_delete,
            },
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        // Unrecognised stored roles get the least privileged role
        let role = row.role.parse().unwrap_or_else(|_| {
            tracing::warn!(user_id = %row.id, role = %row.role, "unknown stored role, treating as viewer");
            Role::Viewer
        });
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct BlogPostRow {
    id: Uuid,
    title: String,
    content: String,
    author_id: Uuid,
    author_name: Option<String>,
    author_email: Option<String>,
    published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        BlogPost {
            id: row.id,
            title: row.title,
            content: row.content,
            author_id: row.author_id,
            author_name: row.author_name.unwrap_or_else(|| "Unknown".to_string()),
            author_email: row.author_email.unwrap_or_default(),
            published: row.published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, email, name, role, created_at";
const POST_COLUMNS: &str =
    "id, title, content, author_id, author_name, author_email, published, created_at, updated_at";

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl RoleAccessStore for PostgresStore {
    async fn list_role_access(&self, role: Option<Role>) -> StoreResult<Vec<RoleAccessEntry>> {
        let rows: Vec<RoleAccessRow> = sqlx::query_as(
            r#"
            SELECT role, page, can_view, can_add, can_edit, can_delete
            FROM role_access
            WHERE $1::text IS NULL OR role = $1
            ORDER BY role, page
            "#,
        )
        .bind(role.map(|r| r.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(RoleAccessRow::into_entry).collect())
    }

    async fn upsert_role_access(&self, entry: &RoleAccessEntry) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_access (role, page, can_view, can_add, can_edit, can_delete, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (role, page) DO UPDATE SET
                can_view = EXCLUDED.can_view,
                can_add = EXCLUDED.can_add,
                can_edit = EXCLUDED.can_edit,
                can_delete = EXCLUDED.can_delete,
                updated_at = NOW()
            "#,
        )
        .bind(entry.role.as_str())
        .bind(&entry.page)
        .bind(entry.access.can_view)
        .bind(entry.access.can_add)
        .bind(entry.access.can_edit)
        .bind(entry.access.can_delete)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users ORDER BY created_at, email",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<User> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::from)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> StoreResult<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }
}

#[async_trait]
impl BlogStore for PostgresStore {
    async fn find_post(&self, id: Uuid) -> StoreResult<BlogPost> {
        let row: Option<BlogPostRow> = sqlx::query_as(&format!(
            "SELECT {} FROM blog_posts WHERE id = $1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BlogPost::from)
            .ok_or_else(|| StoreError::NotFound(format!("post {}", id)))
    }

    async fn update_post(&self, id: Uuid, patch: &BlogPostPatch) -> StoreResult<BlogPost> {
        let row: Option<BlogPostRow> = sqlx::query_as(&format!(
            r#"
            UPDATE blog_posts SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                published = COALESCE($4, published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.content.as_deref())
        .bind(patch.published)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BlogPost::from)
            .ok_or_else(|| StoreError::NotFound(format!("post {}", id)))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("post {}", id)));
        }
        Ok(())
    }
}

impl AdminStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
