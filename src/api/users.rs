use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use super::parse_id;
use crate::error::{AppError, Result};
use crate::middleware::{require_role, CurrentUser, PermissionRequirement};
use crate::models::{AccessField, Role, User, ADMIN_PAGE};
use crate::services::{AccessService, UserService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id/role", put(update_user_role))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserResponse>,
}

async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<UserListResponse>> {
    PermissionRequirement::permission(ADMIN_PAGE, AccessField::View)
        .check(&AccessService::new(state.db.clone()), &current_user)
        .await?;

    let users = UserService::new(state.db.clone()).list_users().await?;

    Ok(Json(UserListResponse {
        success: true,
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRoleResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

async fn update_user_role(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateRoleRequest>, AppError>,
) -> Result<Json<UpdateRoleResponse>> {
    require_role(&current_user, Role::Admin)?;

    let user_id = parse_id(&id, "user")?;
    let user = UserService::new(state.db.clone())
        .update_user_role(user_id, &payload.role)
        .await?;

    Ok(Json(UpdateRoleResponse {
        success: true,
        message: format!("Role for {} set to {}", user.email, user.role),
        user: user.into(),
    }))
}
