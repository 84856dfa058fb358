use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::parse_id;
use crate::error::{AppError, Result};
use crate::middleware::{ensure_author_or_admin, CurrentUser, PermissionRequirement};
use crate::models::{AccessField, BlogPost, BlogPostPatch, BLOG_PAGE};
use crate::services::{AccessService, BlogService};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_post).put(update_post).delete(delete_post))
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub success: bool,
    pub message: String,
    pub post: BlogPost,
}

async fn get_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<PostResponse>> {
    PermissionRequirement::permission(BLOG_PAGE, AccessField::View)
        .check(&AccessService::new(state.db.clone()), &current_user)
        .await?;

    let post_id = parse_id(&id, "post")?;
    let post = BlogService::new(state.db.clone()).get_post(post_id).await?;

    Ok(Json(PostResponse {
        success: true,
        message: "Post fetched successfully".to_string(),
        post,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(max = 300))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

async fn update_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<String>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdatePostRequest>, AppError>,
) -> Result<Json<PostResponse>> {
    PermissionRequirement::permission(BLOG_PAGE, AccessField::Edit)
        .check(&AccessService::new(state.db.clone()), &current_user)
        .await?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationRejected(e.to_string()))?;

    let post_id = parse_id(&id, "post")?;
    let blog_service = BlogService::new(state.db.clone());

    let existing = blog_service.get_post(post_id).await?;
    ensure_author_or_admin(&current_user, &existing)?;

    let patch = BlogPostPatch::new(payload.title, payload.content, payload.published);
    let post = blog_service.update_post(post_id, patch).await?;

    Ok(Json(PostResponse {
        success: true,
        message: "Post updated successfully".to_string(),
        post,
    }))
}

async fn delete_post(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<serde_json::Value>> {
    PermissionRequirement::permission(BLOG_PAGE, AccessField::Delete)
        .check(&AccessService::new(state.db.clone()), &current_user)
        .await?;

    let post_id = parse_id(&id, "post")?;
    let blog_service = BlogService::new(state.db.clone());

    let existing = blog_service.get_post(post_id).await?;
    ensure_author_or_admin(&current_user, &existing)?;

    blog_service.delete_post(post_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Post deleted successfully",
    })))
}
