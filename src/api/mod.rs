mod admin;
mod blog;
mod profile;
mod role_access;
mod users;

use axum::Router;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/role-access", role_access::routes())
        .nest("/users", users::routes())
        .nest("/admin", admin::routes())
        .nest("/profile", profile::routes())
        .nest("/blog", blog::routes())
}

fn parse_id(id: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::ValidationRejected(format!("Invalid {} ID", what)))
}
