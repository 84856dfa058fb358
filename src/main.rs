use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use access_admin::config::Config;
use access_admin::db::Database;
use access_admin::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if config.log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
    tracing::info!("Configuration loaded successfully");
    if config.jwt.allow_insecure_secret {
        tracing::warn!("jwt.allow_insecure_secret is set, tokens are signed with a development secret");
    }

    // Initialize storage
    let db = Database::connect(&config).await?;
    tracing::info!(backend = db.backend_name(), "Storage ready");

    let state = AppState::new(db, config.clone());
    tracing::info!(pages = state.pages.pages().len(), "Page registry loaded");

    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
