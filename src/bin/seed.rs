//! Development seed: one user per role, a sample post, and a token for each user.
//! Run with: cargo run --bin seed

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use access_admin::config::Config;
use access_admin::db::PostgresStore;
use access_admin::models::{Role, User};
use access_admin::services::AuthService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    let database_url = config
        .database
        .url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("DATABASE__URL must be set to seed"))?;

    println!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    PostgresStore::from_pool(pool.clone()).run_migrations().await?;

    println!("Connected successfully!");

    let auth_service = AuthService::new(config.jwt.clone());
    let mut editor_id = None;

    for role in Role::ALL {
        let email = format!("{}@example.com", role);
        let name = format!("Seed {}", role);

        // Existing users keep their id so previously printed tokens stay valid
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (id, email, name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role, updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(&name)
        .bind(role.as_str())
        .fetch_one(&pool)
        .await?;

        if role == Role::Editor {
            editor_id = Some((id, name.clone(), email.clone()));
        }

        let token = auth_service
            .issue_token(&User {
                id,
                email: email.clone(),
                name,
                role,
                created_at: Utc::now(),
            })
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        println!("{:<7} {} {}", role.as_str(), email, id);
        println!("        token: {}", token);
    }

    if let Some((author_id, author_name, author_email)) = editor_id {
        let post_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO blog_posts (id, title, content, author_id, author_name, author_email, published)
            VALUES ($1, 'Hello', 'First post', $2, $3, $4, FALSE)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(author_name)
        .bind(author_email)
        .fetch_one(&pool)
        .await?;

        println!("Sample post: {}", post_id);
    }

    println!("Seed completed");
    Ok(())
}
