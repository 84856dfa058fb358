#![allow(dead_code)]

use access_admin::config::Config;
use access_admin::db::{AdminStore, Database, InMemoryStore};
use access_admin::models::{BlogPost, Role, User};
use access_admin::services::AuthService;
use access_admin::{build_router, AppState};
use axum::body::Body;
use axum::http::Request;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub type App = axum::routing::RouterIntoService<Body, ()>;

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub config: Config,
    pub admin: User,
    pub editor: User,
    pub viewer: User,
    pub post: BlogPost,
}

pub fn user(role: Role, name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role),
        name: name.to_string(),
        role,
        created_at: Utc::now(),
    }
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let admin = user(Role::Admin, "Ada Admin");
        let editor = user(Role::Editor, "Eddie Tor");
        let viewer = user(Role::Viewer, "Vera");
        for u in [&admin, &editor, &viewer] {
            store.insert_user(u.clone()).await;
        }

        let now = Utc::now();
        let post = BlogPost {
            id: Uuid::new_v4(),
            title: "Hello".into(),
            content: "First post".into(),
            author_id: editor.id,
            author_name: editor.name.clone(),
            author_email: editor.email.clone(),
            published: false,
            created_at: now,
            updated_at: now,
        };
        store.insert_post(post.clone()).await;

        Self {
            store,
            config: Config::default(),
            admin,
            editor,
            viewer,
            post,
        }
    }

    pub fn app(&self) -> App {
        self.app_with_store(self.store.clone())
    }

    pub fn app_with_store(&self, store: Arc<dyn AdminStore>) -> App {
        let state = AppState::new(Database::from_store(store), self.config.clone());
        build_router(state).into_service()
    }

    pub fn token(&self, user: &User) -> String {
        AuthService::new(self.config.jwt.clone())
            .issue_token(user)
            .expect("token")
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
