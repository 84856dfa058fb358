pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::db::Database;
use crate::services::PageRegistry;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub pages: PageRegistry,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let pages = PageRegistry::new(config.access.pages.clone());
        Self { db, config, pages }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = api::routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::require_auth,
    ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api)
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
