// User service - user queries and role assignment
use uuid::Uuid;

use crate::db::{Database, UserStore};
use crate::error::{AppError, Result};
use crate::models::{Role, RoleCounts, User};

pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.db.store().list_users().await?)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        Ok(self.db.store().get_user(id).await?)
    }

    pub async fn role_counts(&self) -> Result<RoleCounts> {
        let users = self.list_users().await?;
        Ok(RoleCounts::tally(&users))
    }

    /// Assign `new_role` to a user.
    ///
    /// Tokens already issued keep the old role until the identity provider
    /// issues a new one; nothing here touches live sessions.
    pub async fn update_user_role(&self, id: Uuid, new_role: &str) -> Result<User> {
        let role = new_role
            .parse::<Role>()
            .map_err(|e| AppError::ValidationRejected(e.to_string()))?;

        let user = self.db.store().set_user_role(id, role).await?;
        tracing::info!(user_id = %id, role = %role, "user role updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use chrono::Utc;
    use std::sync::Arc;

    async fn service_with_user(role: Role) -> (UserService, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let id = Uuid::new_v4();
        store
            .insert_user(User {
                id,
                email: "u1@example.com".into(),
                name: "User One".into(),
                role,
                created_at: Utc::now(),
            })
            .await;
        (UserService::new(Database::from_store(store)), id)
    }

    #[tokio::test]
    async fn role_change_is_visible_on_next_read() {
        let (service, id) = service_with_user(Role::Viewer).await;
        service.update_user_role(id, "admin").await.unwrap();
        assert_eq!(service.get_user(id).await.unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn unknown_role_is_rejected_and_nothing_changes() {
        let (service, id) = service_with_user(Role::Editor).await;
        let err = service.update_user_role(id, "superuser").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationRejected(_)));
        assert_eq!(service.get_user(id).await.unwrap().role, Role::Editor);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let (service, _) = service_with_user(Role::Viewer).await;
        let err = service.update_user_role(Uuid::new_v4(), "editor").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn counts_users_per_role() {
        let (service, _) = service_with_user(Role::Editor).await;
        let counts = service.role_counts().await.unwrap();
        assert_eq!(counts.total_users, 1);
        assert_eq!(counts.editor_users, 1);
        assert_eq!(counts.admin_users + counts.viewer_users, 0);
    }
}
