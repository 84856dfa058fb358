//! Handler-level gates: role checks, page permission checks and post ownership.

use crate::error::{AppError, Result};
use crate::models::{AccessField, BlogPost, PageAccess, Role};
use crate::services::AccessService;

use super::CurrentUser;

/// Exact role match. Admin does not implicitly hold the other roles.
pub fn require_role(user: &CurrentUser, role: Role) -> Result<()> {
    if user.role == role {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, required = %role, actual = %user.role, "role check failed");
        Err(AppError::Forbidden)
    }
}

/// Admins may act on any post, everyone else only on their own.
pub fn ensure_author_or_admin(user: &CurrentUser, post: &BlogPost) -> Result<()> {
    if user.role.is_admin() || post.author_id == user.id {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, post_id = %post.id, "not the author of this post");
        Err(AppError::Forbidden)
    }
}

/// Capabilities a caller must hold on a page.
///
/// With no fields the requirement always passes. Otherwise any one field
/// suffices unless `require_all` is set.
#[derive(Debug, Clone)]
pub struct PermissionRequirement {
    page: String,
    fields: Vec<AccessField>,
    require_all: bool,
}

impl PermissionRequirement {
    pub fn permission(page: impl Into<String>, field: AccessField) -> Self {
        Self::any(page, [field])
    }

    pub fn any(page: impl Into<String>, fields: impl IntoIterator<Item = AccessField>) -> Self {
        Self {
            page: page.into(),
            fields: fields.into_iter().collect(),
            require_all: false,
        }
    }

    pub fn all(page: impl Into<String>, fields: impl IntoIterator<Item = AccessField>) -> Self {
        Self {
            require_all: true,
            ..Self::any(page, fields)
        }
    }

    pub fn is_satisfied_by(&self, access: &PageAccess) -> bool {
        if self.fields.is_empty() {
            return true;
        }
        if self.require_all {
            self.fields.iter().all(|field| access.allows(*field))
        } else {
            self.fields.iter().any(|field| access.allows(*field))
        }
    }

    /// Resolve the caller's access on the page and enforce the requirement.
    pub async fn check(&self, access: &AccessService, user: &CurrentUser) -> Result<PageAccess> {
        let resolved = access.resolve_access(user.role, &self.page).await?;
        if self.is_satisfied_by(&resolved) {
            return Ok(resolved);
        }

        tracing::warn!(
            user_id = %user.id,
            role = %user.role,
            page = %self.page,
            fields = ?self.fields,
            "permission check failed"
        );
        Err(AppError::Forbidden)
    }
}
