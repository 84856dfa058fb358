// Access service - resolves and updates per-role page permissions
use crate::db::{Database, RoleAccessStore};
use crate::error::{AppError, Result};
use crate::models::{
    is_fixed, AccessField, AccessPatch, PageAccess, PageInfo, Role, RoleAccessEntry, RoleAccessGrid,
    RoleAccessTable, PROFILE_PAGE,
};

pub struct AccessService {
    db: Database,
}

impl AccessService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// What `role` may do on `page`. Fixed pairs never touch the store.
    pub async fn resolve_access(&self, role: Role, page: &str) -> Result<PageAccess> {
        if is_fixed(role, page) {
            return Ok(PageAccess::FULL);
        }

        let entries = self.db.store().list_role_access(Some(role)).await?;
        Ok(RoleAccessTable::from_entries(entries).resolve(role, page))
    }

    /// Full grid for every role and every page in `pages`, defaults filled in.
    pub async fn resolve_all_access(&self, pages: &[PageInfo]) -> Result<RoleAccessGrid> {
        let entries = self.db.store().list_role_access(None).await?;
        Ok(RoleAccessTable::from_entries(entries).grid(pages))
    }

    pub async fn update_access(&self, role: Role, page: &str, field: AccessField, value: bool) -> Result<PageAccess> {
        self.apply_update(role, page, AccessPatch::single(field, value)).await
    }

    /// Merge `patch` over the currently resolved flags and persist the full row.
    ///
    /// Returns the record that was written. Callers should re-resolve the grid
    /// afterwards rather than patching a local copy.
    pub async fn apply_update(&self, role: Role, page: &str, patch: AccessPatch) -> Result<PageAccess> {
        if role.is_admin() {
            tracing::warn!(page, "rejected attempt to modify admin role access");
            return Err(AppError::ValidationRejected(
                "admin role access cannot be modified".to_string(),
            ));
        }
        if page == PROFILE_PAGE {
            tracing::warn!(role = %role, "rejected attempt to modify profile page access");
            return Err(AppError::ValidationRejected(format!(
                "{} access is fixed for every role",
                PROFILE_PAGE
            )));
        }
        if page.trim().is_empty() {
            return Err(AppError::ValidationRejected("page is required".to_string()));
        }
        if patch.is_empty() {
            return Err(AppError::ValidationRejected(
                "at least one access flag is required".to_string(),
            ));
        }

        let current = self.resolve_access(role, page).await?;
        let updated = current.merged(&patch);

        self.db
            .store()
            .upsert_role_access(&RoleAccessEntry {
                role,
                page: page.to_string(),
                access: updated,
            })
            .await?;

        tracing::info!(role = %role, page, access = ?updated, "role access updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn service() -> (AccessService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let db = Database::from_store(store.clone());
        (AccessService::new(db), store)
    }

    #[tokio::test]
    async fn empty_store_resolves_view_only() {
        let (service, _) = service();
        let access = assert_ok!(service.resolve_access(Role::Editor, "/reports").await);
        assert_eq!(access, PageAccess::VIEW_ONLY);
    }

    #[tokio::test]
    async fn stored_row_is_returned_verbatim() {
        let (service, store) = service();
        let none = PageAccess {
            can_view: false,
            can_add: false,
            can_edit: false,
            can_delete: false,
        };
        store
            .upsert_role_access(&RoleAccessEntry {
                role: Role::Editor,
                page: "/reports".into(),
                access: none,
            })
            .await
            .unwrap();

        assert_eq!(service.resolve_access(Role::Editor, "/reports").await.unwrap(), none);
    }

    #[tokio::test]
    async fn single_field_update_keeps_other_flags() {
        let (service, _) = service();
        let before = service.resolve_access(Role::Editor, "/x").await.unwrap();

        let written = assert_ok!(service.update_access(Role::Editor, "/x", AccessField::Add, true).await);
        let after = service.resolve_access(Role::Editor, "/x").await.unwrap();

        assert_eq!(written, after);
        assert!(after.can_add);
        assert_eq!(after.can_view, before.can_view);
        assert_eq!(after.can_edit, before.can_edit);
        assert_eq!(after.can_delete, before.can_delete);
    }

    #[tokio::test]
    async fn updates_persist_complete_rows() {
        let (service, store) = service();
        service
            .update_access(Role::Viewer, "/blog", AccessField::Delete, true)
            .await
            .unwrap();

        let rows = store.list_role_access(Some(Role::Viewer)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].access,
            PageAccess {
                can_delete: true,
                ..PageAccess::VIEW_ONLY
            }
        );
    }

    #[tokio::test]
    async fn admin_updates_are_rejected_for_every_field() {
        let (service, store) = service();
        for field in AccessField::ALL {
            for page in ["/blog", "/admin", "/x"] {
                let err = assert_err!(service.update_access(Role::Admin, page, field, false).await);
                assert!(matches!(err, AppError::ValidationRejected(_)));
                assert_eq!(service.resolve_access(Role::Admin, page).await.unwrap(), PageAccess::FULL);
            }
        }
        assert!(store.list_role_access(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_and_blank_pages_are_rejected() {
        let (service, store) = service();
        assert_err!(service.update_access(Role::Viewer, PROFILE_PAGE, AccessField::View, false).await);
        assert_err!(service.update_access(Role::Viewer, "  ", AccessField::View, false).await);
        assert_err!(service.apply_update(Role::Viewer, "/blog", AccessPatch::default()).await);
        assert!(store.list_role_access(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn grid_is_total() {
        let (service, _) = service();
        service
            .update_access(Role::Editor, "/blog", AccessField::Edit, true)
            .await
            .unwrap();
        let pages = vec![PageInfo::new("/blog", "Blog"), PageInfo::new("/admin", "Admin")];

        let grid = service.resolve_all_access(&pages).await.unwrap();
        assert_eq!(grid.len(), 6);
        assert!(grid.get(Role::Editor, "/blog").unwrap().access.can_edit);
        assert_eq!(grid.get(Role::Viewer, "/admin").unwrap().access, PageAccess::VIEW_ONLY);
        assert_eq!(grid.get(Role::Admin, "/admin").unwrap().access, PageAccess::FULL);
    }
}
