use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Headcount per role, shown on the admin overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCounts {
    pub total_users: usize,
    pub admin_users: usize,
    pub editor_users: usize,
    pub viewer_users: usize,
}

impl RoleCounts {
    pub fn tally<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        users.into_iter().fold(Self::default(), |mut counts, user| {
            counts.total_users += 1;
            match user.role {
                Role::Admin => counts.admin_users += 1,
                Role::Editor => counts.editor_users += 1,
                Role::Viewer => counts.viewer_users += 1,
            }
            counts
        })
    }
}
