use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Role;
use crate::services::AuthService;
use crate::AppState;

/// Cookie consulted when no `Authorization` header is sent.
pub const SESSION_COOKIE: &str = "access_token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,       // User ID
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,        // Expiration time
    pub iat: usize,        // Issued at
}

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
        Ok(Self {
            id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
        .or_else(|| jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string()))
        .ok_or(AppError::Unauthorized)?;

    let claims = AuthService::new(state.config.jwt.clone()).verify_token(&token)?;
    let current_user = CurrentUser::try_from(claims)?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
