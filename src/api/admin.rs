use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::{CurrentUser, PermissionRequirement};
use crate::models::{AccessField, RoleCounts, ADMIN_PAGE};
use crate::services::{AccessService, UserService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/overview", get(get_overview))
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub success: bool,
    #[serde(flatten)]
    pub counts: RoleCounts,
}

async fn get_overview(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<OverviewResponse>> {
    PermissionRequirement::permission(ADMIN_PAGE, AccessField::View)
        .check(&AccessService::new(state.db.clone()), &current_user)
        .await?;

    let counts = UserService::new(state.db.clone()).role_counts().await?;

    Ok(Json(OverviewResponse {
        success: true,
        counts,
    }))
}
