use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, PermissionRequirement};
use crate::models::{AccessField, AccessPatch, PageAccess, PageInfo, Role, RoleAccessGrid, ADMIN_PAGE};
use crate::services::AccessService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_role_access).put(update_role_access))
        .route("/me", get(get_my_access))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAccessResponse {
    pub success: bool,
    pub role_access: RoleAccessGrid,
    pub pages: Vec<PageInfo>,
}

async fn get_role_access(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<RoleAccessResponse>> {
    let access_service = AccessService::new(state.db.clone());
    PermissionRequirement::permission(ADMIN_PAGE, AccessField::View)
        .check(&access_service, &current_user)
        .await?;

    let pages = state.pages.pages().to_vec();
    let role_access = access_service.resolve_all_access(&pages).await?;

    Ok(Json(RoleAccessResponse {
        success: true,
        role_access,
        pages,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleAccessRequest {
    pub role: String,
    #[validate(length(min = 1, max = 256))]
    pub page: String,
    #[serde(flatten)]
    pub access: AccessPatch,
}

#[derive(Debug, Serialize)]
pub struct UpdateRoleAccessResponse {
    pub success: bool,
    pub message: String,
    pub role: Role,
    pub page: String,
    pub access: PageAccess,
}

async fn update_role_access(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRoleAccessRequest>, AppError>,
) -> Result<Json<UpdateRoleAccessResponse>> {
    let access_service = AccessService::new(state.db.clone());
    PermissionRequirement::permission(ADMIN_PAGE, AccessField::Edit)
        .check(&access_service, &current_user)
        .await?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationRejected(e.to_string()))?;

    let role = payload
        .role
        .parse::<Role>()
        .map_err(|e| AppError::ValidationRejected(e.to_string()))?;

    let access = access_service
        .apply_update(role, &payload.page, payload.access)
        .await?;

    Ok(Json(UpdateRoleAccessResponse {
        success: true,
        message: format!("Access for {} on {} updated", role, payload.page),
        role,
        page: payload.page,
        access,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MyAccessQuery {
    pub page: String,
}

#[derive(Debug, Serialize)]
pub struct MyAccessResponse {
    pub success: bool,
    pub page: String,
    pub permissions: PageAccess,
}

async fn get_my_access(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Query(query), _): WithRejection<Query<MyAccessQuery>, AppError>,
) -> Result<Json<MyAccessResponse>> {
    let permissions = AccessService::new(state.db.clone())
        .resolve_access(current_user.role, &query.page)
        .await?;

    Ok(Json(MyAccessResponse {
        success: true,
        page: query.page,
        permissions,
    }))
}
