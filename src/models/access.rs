//! Role/page access model.
//!
//! A [`RoleAccessTable`] is a snapshot of the persisted (role, page) grants.
//! Resolution against a snapshot is pure: admin and the profile page are always
//! fully granted, a stored row is returned verbatim, and anything else falls
//! back to view-only.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::Role;

/// Page every role may fully use, regardless of what is stored.
pub const PROFILE_PAGE: &str = "/profile";
/// Page guarding user and role access management.
pub const ADMIN_PAGE: &str = "/admin";
/// Page guarding blog post operations.
pub const BLOG_PAGE: &str = "/blog";

/// The four capability flags for a (role, page) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAccess {
    pub can_view: bool,
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl PageAccess {
    pub const FULL: PageAccess = PageAccess {
        can_view: true,
        can_add: true,
        can_edit: true,
        can_delete: true,
    };

    /// Applied to any pair without a stored row: visible, but no mutation rights.
    pub const VIEW_ONLY: PageAccess = PageAccess {
        can_view: true,
        can_add: false,
        can_edit: false,
        can_delete: false,
    };

    pub fn allows(&self, field: AccessField) -> bool {
        match field {
            AccessField::View => self.can_view,
            AccessField::Add => self.can_add,
            AccessField::Edit => self.can_edit,
            AccessField::Delete => self.can_delete,
        }
    }

    pub fn set(&mut self, field: AccessField, value: bool) {
        match field {
            AccessField::View => self.can_view = value,
            AccessField::Add => self.can_add = value,
            AccessField::Edit => self.can_edit = value,
            AccessField::Delete => self.can_delete = value,
        }
    }

    /// Merge the provided flags over `self`; absent flags keep their current value.
    pub fn merged(mut self, patch: &AccessPatch) -> Self {
        for field in AccessField::ALL {
            if let Some(value) = patch.get(field) {
                self.set(field, value);
            }
        }
        self
    }
}

/// Names of the individual capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessField {
    #[serde(rename = "canView")]
    View,
    #[serde(rename = "canAdd")]
    Add,
    #[serde(rename = "canEdit")]
    Edit,
    #[serde(rename = "canDelete")]
    Delete,
}

impl AccessField {
    pub const ALL: [AccessField; 4] = [
        AccessField::View,
        AccessField::Add,
        AccessField::Edit,
        AccessField::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessField::View => "canView",
            AccessField::Add => "canAdd",
            AccessField::Edit => "canEdit",
            AccessField::Delete => "canDelete",
        }
    }
}

impl fmt::Display for AccessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown access field: {}", s))
    }
}

/// Partial update of a [`PageAccess`]; `None` leaves the flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPatch {
    pub can_view: Option<bool>,
    pub can_add: Option<bool>,
    pub can_edit: Option<bool>,
    pub can_delete: Option<bool>,
}

impl AccessPatch {
    pub fn single(field: AccessField, value: bool) -> Self {
        let mut patch = Self::default();
        match field {
            AccessField::View => patch.can_view = Some(value),
            AccessField::Add => patch.can_add = Some(value),
            AccessField::Edit => patch.can_edit = Some(value),
            AccessField::Delete => patch.can_delete = Some(value),
        }
        patch
    }

    pub fn get(&self, field: AccessField) -> Option<bool> {
        match field {
            AccessField::View => self.can_view,
            AccessField::Add => self.can_add,
            AccessField::Edit => self.can_edit,
            AccessField::Delete => self.can_delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        AccessField::ALL.iter().all(|field| self.get(*field).is_none())
    }
}

/// One persisted row of the role access table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAccessEntry {
    pub role: Role,
    pub page: String,
    #[serde(flatten)]
    pub access: PageAccess,
}

/// A protected route and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub path: String,
    pub name: String,
}

impl PageInfo {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// True when the pair's access is fixed and cannot be changed by any write.
pub fn is_fixed(role: Role, page: &str) -> bool {
    role.is_admin() || page == PROFILE_PAGE
}

/// Snapshot of the stored grants, keyed by role then page.
#[derive(Debug, Clone, Default)]
pub struct RoleAccessTable {
    rows: HashMap<Role, HashMap<String, PageAccess>>,
}

impl RoleAccessTable {
    pub fn from_entries(entries: impl IntoIterator<Item = RoleAccessEntry>) -> Self {
        let mut rows: HashMap<Role, HashMap<String, PageAccess>> = HashMap::new();
        for entry in entries {
            rows.entry(entry.role)
                .or_default()
                .insert(entry.page, entry.access);
        }
        Self { rows }
    }

    pub fn stored(&self, role: Role, page: &str) -> Option<PageAccess> {
        self.rows.get(&role).and_then(|pages| pages.get(page)).copied()
    }

    pub fn resolve(&self, role: Role, page: &str) -> PageAccess {
        if is_fixed(role, page) {
            return PageAccess::FULL;
        }
        self.stored(role, page).unwrap_or(PageAccess::VIEW_ONLY)
    }

    /// Resolve every role against every page. The result never has holes.
    pub fn grid(&self, pages: &[PageInfo]) -> RoleAccessGrid {
        let mut grid = BTreeMap::new();
        for role in Role::ALL {
            let row: BTreeMap<String, PageGrant> = pages
                .iter()
                .map(|page| {
                    let grant = PageGrant {
                        page: page.path.clone(),
                        page_name: page.name.clone(),
                        access: self.resolve(role, &page.path),
                    };
                    (page.path.clone(), grant)
                })
                .collect();
            grid.insert(role, row);
        }
        RoleAccessGrid(grid)
    }
}

/// A resolved grant as shown in the admin grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGrant {
    pub page: String,
    pub page_name: String,
    #[serde(flatten)]
    pub access: PageAccess,
}

/// Complete role × page grid, serialized as `{ role: { page: grant } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleAccessGrid(BTreeMap<Role, BTreeMap<String, PageGrant>>);

impl RoleAccessGrid {
    pub fn get(&self, role: Role, page: &str) -> Option<&PageGrant> {
        self.0.get(&role).and_then(|pages| pages.get(page))
    }

    /// Number of (role, page) grants in the grid.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: Role, page: &str, access: PageAccess) -> RoleAccessEntry {
        RoleAccessEntry {
            role,
            page: page.to_string(),
            access,
        }
    }

    const NONE: PageAccess = PageAccess {
        can_view: false,
        can_add: false,
        can_edit: false,
        can_delete: false,
    };

    #[test]
    fn admin_is_fully_granted_on_every_page() {
        // Even a stored admin row cannot narrow admin access.
        let table = RoleAccessTable::from_entries([entry(Role::Admin, "/blog", NONE)]);
        for page in ["/blog", "/admin", "/reports", "", PROFILE_PAGE] {
            assert_eq!(table.resolve(Role::Admin, page), PageAccess::FULL);
        }
    }

    #[test]
    fn profile_overrides_stored_rows_for_every_role() {
        let table = RoleAccessTable::from_entries([
            entry(Role::Editor, PROFILE_PAGE, NONE),
            entry(Role::Viewer, PROFILE_PAGE, NONE),
        ]);
        for role in Role::ALL {
            assert_eq!(table.resolve(role, PROFILE_PAGE), PageAccess::FULL);
        }
    }

    #[test]
    fn missing_rows_are_view_only() {
        let table = RoleAccessTable::default();
        assert_eq!(table.resolve(Role::Editor, "/reports"), PageAccess::VIEW_ONLY);
        assert_eq!(table.resolve(Role::Viewer, "/unknown"), PageAccess::VIEW_ONLY);
    }

    #[test]
    fn stored_rows_are_returned_verbatim() {
        let table = RoleAccessTable::from_entries([entry(Role::Editor, "/reports", NONE)]);
        let resolved = table.resolve(Role::Editor, "/reports");
        assert_eq!(resolved, NONE);
        assert!(!resolved.can_view);
        // Other roles are unaffected.
        assert_eq!(table.resolve(Role::Viewer, "/reports"), PageAccess::VIEW_ONLY);
    }

    #[test]
    fn grid_covers_every_role_and_page() {
        let pages = vec![
            PageInfo::new("/dashboard", "Dashboard"),
            PageInfo::new("/blog", "Blog"),
            PageInfo::new(PROFILE_PAGE, "Profile"),
        ];
        let table = RoleAccessTable::from_entries([entry(
            Role::Viewer,
            "/blog",
            PageAccess {
                can_add: true,
                ..PageAccess::VIEW_ONLY
            },
        )]);

        let grid = table.grid(&pages);
        assert_eq!(grid.len(), pages.len() * 3);
        for role in Role::ALL {
            for page in &pages {
                let grant = grid.get(role, &page.path).expect("grant");
                assert_eq!(grant.page_name, page.name);
                assert_eq!(grant.access, table.resolve(role, &page.path));
            }
        }
        assert!(grid.get(Role::Viewer, "/blog").unwrap().access.can_add);
    }

    #[test]
    fn grid_serializes_as_nested_maps() {
        let grid = RoleAccessTable::default().grid(&[PageInfo::new("/blog", "Blog")]);
        let value = serde_json::to_value(&grid).unwrap();
        assert_eq!(value["editor"]["/blog"]["pageName"], "Blog");
        assert_eq!(value["editor"]["/blog"]["canView"], true);
        assert_eq!(value["editor"]["/blog"]["canEdit"], false);
        assert_eq!(value["admin"]["/blog"]["canDelete"], true);
    }

    #[test]
    fn merge_touches_only_provided_flags() {
        let merged = PageAccess::VIEW_ONLY.merged(&AccessPatch::single(AccessField::Add, true));
        assert_eq!(
            merged,
            PageAccess {
                can_add: true,
                ..PageAccess::VIEW_ONLY
            }
        );

        let untouched = NONE.merged(&AccessPatch::default());
        assert_eq!(untouched, NONE);
    }

    #[test]
    fn access_field_names_round_trip_through_strings() {
        for field in AccessField::ALL {
            assert_eq!(field.as_str().parse::<AccessField>(), Ok(field));
        }
        assert!("canFly".parse::<AccessField>().is_err());
    }

    #[test]
    fn fixed_pairs() {
        assert!(is_fixed(Role::Admin, "/blog"));
        assert!(is_fixed(Role::Viewer, PROFILE_PAGE));
        assert!(!is_fixed(Role::Editor, "/blog"));
    }
}
