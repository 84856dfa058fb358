use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::{PageAccess, Role, PROFILE_PAGE};
use crate::services::{AccessService, UserService};
use crate::utils::initials;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub initials: String,
    pub member_since: String,
    pub permissions: PageAccess,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: Profile,
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>> {
    let user = UserService::new(state.db.clone()).get_user(current_user.id).await?;
    let permissions = AccessService::new(state.db.clone())
        .resolve_access(user.role, PROFILE_PAGE)
        .await?;

    let display_name = if user.name.trim().is_empty() { &user.email } else { &user.name };

    Ok(Json(ProfileResponse {
        success: true,
        profile: Profile {
            id: user.id.to_string(),
            initials: initials(display_name),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            member_since: user.created_at.to_rfc3339(),
            permissions,
        },
    }))
}
